//! Project lifecycle: create, update, load and delete saved cases.
//!
//! The project list is persisted as one JSON snapshot through an injected
//! `SnapshotStore`. Read-modify-write cycles are serialized by a mutex so
//! concurrent requests never lose each other's updates.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::case::CaseDetails;
use crate::models::message::Message;
use crate::models::project::{ReportProject, UNNAMED_PROJECT};
use crate::models::report::ReportResult;

pub mod handlers;
pub mod store;

use store::SnapshotStore;

/// Storage key of the project list snapshot.
pub const PROJECTS_KEY: &str = "triguard_projects";

pub struct ProjectManager {
    store: Arc<dyn SnapshotStore>,
    write_lock: Mutex<()>,
    /// One lock per project, held for a whole chat turn.
    chat_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ProjectManager {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            chat_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Serializes chat turns on one project.
    ///
    /// A turn reads the history, waits on the model and writes the history
    /// back, so the guard must be held across all three steps. Clearing the
    /// history takes the same guard.
    pub async fn lock_chat(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self.chat_locks.lock().await.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    /// All projects in creation order.
    pub async fn list(&self) -> Result<Vec<ReportProject>, AppError> {
        self.load_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<ReportProject, AppError> {
        self.load_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
    }

    /// Creates a project, or updates `current_id` when given.
    ///
    /// On update the name follows the company name, and existing reports are
    /// kept when `reports` is `None`.
    pub async fn save(
        &self,
        current_id: Option<Uuid>,
        details: CaseDetails,
        reports: Option<ReportResult>,
    ) -> Result<ReportProject, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_all().await?;
        let now = now_millis();

        let saved = match current_id {
            Some(id) => {
                let project = projects
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))?;
                project.name = details.company_name.clone();
                project.updated_at = now;
                project.data = details;
                if reports.is_some() {
                    project.reports = reports;
                }
                info!(project_id = %id, "Project updated");
                project.clone()
            }
            None => {
                let name = if details.company_name.trim().is_empty() {
                    UNNAMED_PROJECT.to_string()
                } else {
                    details.company_name.clone()
                };
                let project = ReportProject {
                    id: Uuid::new_v4(),
                    name,
                    created_at: now,
                    updated_at: now,
                    data: details,
                    reports,
                    chat_history: Vec::new(),
                };
                info!(project_id = %project.id, "Project created");
                projects.push(project.clone());
                project
            }
        };

        self.save_all(&projects).await?;
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_all().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(AppError::NotFound(format!("Project {id} not found")));
        }
        self.save_all(&projects).await?;
        self.chat_locks.lock().await.remove(&id);
        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub async fn update_chat_history(
        &self,
        id: Uuid,
        history: Vec<Message>,
    ) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_all().await?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))?;
        project.chat_history = history;
        project.updated_at = now_millis();
        self.save_all(&projects).await
    }

    /// A snapshot that fails to parse is logged and treated as empty.
    async fn load_all(&self) -> Result<Vec<ReportProject>, AppError> {
        let Some(raw) = self.store.load(PROJECTS_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                warn!("Failed to parse saved projects, starting empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn save_all(&self, projects: &[ReportProject]) -> Result<(), AppError> {
        let raw = serde_json::to_string(projects)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize projects: {e}")))?;
        self.store.save(PROJECTS_KEY, &raw).await?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::GeneratedReport;
    use store::MemorySnapshotStore;

    fn manager() -> (ProjectManager, Arc<MemorySnapshotStore>) {
        let store = Arc::new(MemorySnapshotStore::default());
        (ProjectManager::new(store.clone()), store)
    }

    fn case(name: &str) -> CaseDetails {
        CaseDetails {
            company_name: name.to_string(),
            ..Default::default()
        }
    }

    fn reports() -> ReportResult {
        ReportResult {
            labor_inspection: Some(GeneratedReport {
                subject: "檢舉".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_creates_project() {
        let (manager, store) = manager();
        let project = manager.save(None, case("大發科技"), None).await.unwrap();
        assert_eq!(project.name, "大發科技");
        assert_eq!(project.created_at, project.updated_at);
        assert!(project.chat_history.is_empty());

        let raw = store.load(PROJECTS_KEY).await.unwrap().unwrap();
        assert!(raw.contains("大發科技"));
        assert_eq!(manager.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unnamed_project() {
        let (manager, _) = manager();
        let project = manager.save(None, case(""), None).await.unwrap();
        assert_eq!(project.name, UNNAMED_PROJECT);
    }

    #[tokio::test]
    async fn test_update_keeps_reports_when_none_given() {
        let (manager, _) = manager();
        let created = manager
            .save(None, case("舊名"), Some(reports()))
            .await
            .unwrap();

        let updated = manager
            .save(Some(created.id), case("新名"), None)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "新名");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.reports, Some(reports()));
        assert_eq!(manager.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_project_is_not_found() {
        let (manager, _) = manager();
        let err = manager
            .save(Some(Uuid::new_v4()), case("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_and_get() {
        let (manager, _) = manager();
        let a = manager.save(None, case("A"), None).await.unwrap();
        let b = manager.save(None, case("B"), None).await.unwrap();

        manager.delete(a.id).await.unwrap();
        assert!(matches!(manager.get(a.id).await, Err(AppError::NotFound(_))));
        assert_eq!(manager.get(b.id).await.unwrap().name, "B");
        assert!(matches!(
            manager.delete(a.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_chat_history_is_stored_per_project() {
        let (manager, _) = manager();
        let project = manager.save(None, case("A"), None).await.unwrap();
        let history = vec![Message::user("問題"), Message::model("回答")];
        manager
            .update_chat_history(project.id, history.clone())
            .await
            .unwrap();
        assert_eq!(manager.get(project.id).await.unwrap().chat_history, history);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_reads_as_empty() {
        let (manager, store) = manager();
        store.save(PROJECTS_KEY, "{not json").await.unwrap();
        assert!(manager.list().await.unwrap().is_empty());

        manager.save(None, case("A"), None).await.unwrap();
        assert_eq!(manager.list().await.unwrap().len(), 1);
    }
}
