pub mod case;
pub mod message;
pub mod project;
pub mod report;
