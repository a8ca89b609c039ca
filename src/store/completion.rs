//! Completion engine. Per (user, task) the state machine is
//! Unclaimed -> Completed, terminal; the idempotency check and the payout
//! happen under one write lock so concurrent claims cannot double-pay.

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::task::{Task, TaskStatus, WeeklyTaskStats};
use crate::models::user::TaskCompletion;
use crate::store::Store;

impl Store {
    pub async fn complete_task(&self, caller: &Caller, task_id: u64) -> Result<(), AppError> {
        let id = caller.authenticated()?;
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .get(&task_id)
            .ok_or_else(|| AppError::not_found(format!("task {task_id}")))?;
        if task.status != TaskStatus::Open {
            return Err(AppError::not_found(format!("task {task_id} is not open")));
        }
        let reward = task.reward;

        let user = state.user_mut(id)?;
        if user.has_completed(task_id) {
            return Err(AppError::AlreadyCompleted);
        }
        user.completed_tasks.push(TaskCompletion {
            task_id,
            timestamp: Utc::now(),
        });
        user.balance += reward;
        user.total_earnings += reward;
        info!(
            user = %id,
            task = task_id,
            reward,
            balance = user.balance,
            "task completed"
        );
        Ok(())
    }

    pub async fn completed_tasks(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> Result<Vec<u64>, AppError> {
        caller.require_self_or_admin(user_id)?;
        let state = self.state.read().await;
        Ok(state
            .user(user_id)?
            .completed_tasks
            .iter()
            .map(|c| c.task_id)
            .collect())
    }

    /// Open tasks the caller has not completed yet.
    pub async fn daily_tasks(&self, caller: &Caller) -> Result<Vec<Task>, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        let user = state.user(id)?;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Open && !user.has_completed(t.id))
            .cloned()
            .collect())
    }

    /// Same set as `daily_tasks`, best-paying first.
    pub async fn tasks_by_reward(&self, caller: &Caller) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.daily_tasks(caller).await?;
        tasks.sort_by(|a, b| b.reward.cmp(&a.reward));
        Ok(tasks)
    }

    /// Aggregation over the last seven days of the user's history. Rewards
    /// for tasks since deleted from the catalog count as zero.
    pub async fn weekly_task_stats(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> Result<WeeklyTaskStats, AppError> {
        caller.require_self_or_admin(user_id)?;
        let state = self.state.read().await;
        let user = state.user(user_id)?;
        let cutoff = Utc::now() - Duration::days(7);
        let recent: Vec<&TaskCompletion> = user
            .completed_tasks
            .iter()
            .filter(|c| c.timestamp >= cutoff)
            .collect();
        let total_points = recent
            .iter()
            .filter_map(|c| state.tasks.get(&c.task_id))
            .map(|t| t.reward)
            .sum();
        Ok(WeeklyTaskStats {
            completed_tasks: recent.len() as u64,
            total_points,
        })
    }

    pub async fn user_points(&self, caller: &Caller, user_id: Uuid) -> Result<u64, AppError> {
        caller.require_self_or_admin(user_id)?;
        let state = self.state.read().await;
        Ok(state.user(user_id)?.total_earnings)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::models::task::TaskStatus;
    use crate::store::testutil::{open_task, register_user, store_with_admin};

    #[tokio::test]
    async fn completion_pays_once() {
        let (store, admin) = store_with_admin().await;
        store.add_task(&admin, open_task(1, 20)).await.unwrap();
        let user = register_user(&store, "alice").await;

        store.complete_task(&user, 1).await.unwrap();
        assert_eq!(store.get_balance(&user).await.unwrap(), 20);

        let err = store.complete_task(&user, 1).await.unwrap_err();
        assert_eq!(err, AppError::AlreadyCompleted);
        assert_eq!(store.get_balance(&user).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn only_open_tasks_can_be_completed() {
        let (store, admin) = store_with_admin().await;
        let mut task = open_task(1, 20);
        task.status = TaskStatus::InProgress;
        store.add_task(&admin, task).await.unwrap();
        let user = register_user(&store, "alice").await;

        assert!(matches!(
            store.complete_task(&user, 1).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            store.complete_task(&user, 404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert_eq!(store.get_balance(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn catalog_status_is_independent_of_user_completion() {
        let (store, admin) = store_with_admin().await;
        store.add_task(&admin, open_task(1, 10)).await.unwrap();
        let user = register_user(&store, "alice").await;

        store.complete_task(&user, 1).await.unwrap();

        let stats = store.task_stats().await;
        assert_eq!(stats.total_tasks, 1);
        assert_eq!(stats.open_tasks, 1, "completion does not close the task");
        assert_eq!(stats.completed_tasks, 0);
    }

    #[tokio::test]
    async fn daily_tasks_exclude_completed_and_non_open() {
        let (store, admin) = store_with_admin().await;
        store.add_task(&admin, open_task(1, 10)).await.unwrap();
        store.add_task(&admin, open_task(2, 30)).await.unwrap();
        let mut closed = open_task(3, 5);
        closed.status = TaskStatus::Completed;
        store.add_task(&admin, closed).await.unwrap();
        let user = register_user(&store, "alice").await;

        store.complete_task(&user, 1).await.unwrap();

        let daily: Vec<u64> = store
            .daily_tasks(&user)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(daily, vec![2]);
    }

    #[tokio::test]
    async fn weekly_stats_cover_recent_completions() {
        let (store, admin) = store_with_admin().await;
        store.add_task(&admin, open_task(1, 10)).await.unwrap();
        store.add_task(&admin, open_task(2, 30)).await.unwrap();
        let user = register_user(&store, "alice").await;
        let id = user.id.unwrap();

        store.complete_task(&user, 1).await.unwrap();
        store.complete_task(&user, 2).await.unwrap();

        let stats = store.weekly_task_stats(&user, id).await.unwrap();
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.total_points, 40);

        // Deterministic with no intervening writes.
        assert_eq!(store.weekly_task_stats(&user, id).await.unwrap(), stats);
    }

    #[tokio::test]
    async fn tasks_by_reward_sorts_descending() {
        let (store, admin) = store_with_admin().await;
        store.add_task(&admin, open_task(1, 10)).await.unwrap();
        store.add_task(&admin, open_task(2, 30)).await.unwrap();
        store.add_task(&admin, open_task(3, 20)).await.unwrap();
        let user = register_user(&store, "alice").await;

        let rewards: Vec<u64> = store
            .tasks_by_reward(&user)
            .await
            .unwrap()
            .iter()
            .map(|t| t.reward)
            .collect();
        assert_eq!(rewards, vec![30, 20, 10]);
    }
}
