//! Task catalog: admin-managed set of offered tasks.

use tracing::info;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::task::{Task, TaskStats, TaskStatus, TaskUpdate};
use crate::store::Store;

impl Store {
    pub async fn add_task(&self, caller: &Caller, task: Task) -> Result<(), AppError> {
        caller.require_admin()?;
        if task.title.trim().is_empty() {
            return Err(AppError::invalid("task title must not be empty"));
        }
        let mut state = self.state.write().await;
        if state.tasks.contains_key(&task.id) {
            return Err(AppError::conflict(format!("task {}", task.id)));
        }
        info!(task = task.id, reward = task.reward, "task added");
        state.tasks.insert(task.id, task);
        Ok(())
    }

    /// Hard removal. Past completions referencing the task stay in user
    /// histories untouched.
    pub async fn delete_task(&self, caller: &Caller, task_id: u64) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut state = self.state.write().await;
        state
            .tasks
            .remove(&task_id)
            .ok_or_else(|| AppError::not_found(format!("task {task_id}")))?;
        info!(task = task_id, "task deleted");
        Ok(())
    }

    /// Applies the whole batch or none of it, so concurrent readers never
    /// observe a partially updated catalog.
    pub async fn update_tasks(
        &self,
        caller: &Caller,
        updates: Vec<TaskUpdate>,
    ) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut state = self.state.write().await;
        for update in &updates {
            if !state.tasks.contains_key(&update.task_id) {
                return Err(AppError::not_found(format!("task {}", update.task_id)));
            }
            if update.updated_task.id != update.task_id {
                return Err(AppError::invalid(format!(
                    "update for task {} carries id {}",
                    update.task_id, update.updated_task.id
                )));
            }
        }
        for update in updates {
            let mut task = update.updated_task;
            task.title = update.updated_title;
            state.tasks.insert(update.task_id, task);
        }
        Ok(())
    }

    pub async fn get_all_tasks(&self) -> Vec<Task> {
        let state = self.state.read().await;
        state.tasks.values().cloned().collect()
    }

    pub async fn get_task_by_id(&self, task_id: u64) -> Result<Task, AppError> {
        let state = self.state.read().await;
        state
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("task {task_id}")))
    }

    /// Counts by catalog status only; per-user completion does not flip a
    /// task's catalog status.
    pub async fn task_stats(&self) -> TaskStats {
        let state = self.state.read().await;
        let total_tasks = state.tasks.len() as u64;
        let completed_tasks = state
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Completed)
            .count() as u64;
        let open_tasks = state
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Open)
            .count() as u64;
        TaskStats {
            total_tasks,
            completed_tasks,
            open_tasks,
        }
    }
}
