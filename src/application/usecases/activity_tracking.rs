use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::activities::{
        ActivityEntity, InsertActivityEntity, InsertLoginAttemptEntity, LoginAttemptEntity,
    },
    repositories::activities::ActivityRepository,
    value_objects::enums::activity_types::ActivityType,
};

pub const RECENT_ACTIVITY_LIMIT: i64 = 50;
pub const RECENT_LOGIN_LIMIT: i64 = 20;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActivityError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ActivityError>;

/// Writers are best-effort: an audit store outage never fails the flow
/// being audited. Readers surface errors normally.
pub struct ActivityTrackingUseCase<A>
where
    A: ActivityRepository + Send + Sync + 'static,
{
    activity_repo: Arc<A>,
}

impl<A> ActivityTrackingUseCase<A>
where
    A: ActivityRepository + Send + Sync + 'static,
{
    pub fn new(activity_repo: Arc<A>) -> Self {
        Self { activity_repo }
    }

    pub async fn record(
        &self,
        user_id: Uuid,
        activity_type: ActivityType,
        success: bool,
        metadata: serde_json::Value,
    ) {
        if let Err(err) = self
            .activity_repo
            .append(InsertActivityEntity {
                user_id,
                activity_type: activity_type.to_string(),
                success,
                metadata,
            })
            .await
        {
            warn!(
                %user_id,
                activity_type = %activity_type,
                db_error = ?err,
                "activity: entry dropped"
            );
        }
    }

    pub async fn record_login_attempt(
        &self,
        user_id: Uuid,
        email: &str,
        method: &str,
        success: bool,
        error: Option<String>,
    ) {
        if let Err(err) = self
            .activity_repo
            .append_login_attempt(InsertLoginAttemptEntity {
                user_id,
                email: email.to_string(),
                method: method.to_string(),
                success,
                error,
            })
            .await
        {
            warn!(
                %user_id,
                db_error = ?err,
                "activity: login attempt entry dropped"
            );
        }
    }

    pub async fn recent_activity(&self, user_id: Uuid) -> UseCaseResult<Vec<ActivityEntity>> {
        Ok(self
            .activity_repo
            .recent_by_user(user_id, RECENT_ACTIVITY_LIMIT)
            .await?)
    }

    pub async fn recent_login_attempts(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Vec<LoginAttemptEntity>> {
        Ok(self
            .activity_repo
            .recent_login_attempts_by_user(user_id, RECENT_LOGIN_LIMIT)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::activities::MockActivityRepository;
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn record_swallows_repository_failure() {
        let mut activity_repo = MockActivityRepository::new();
        activity_repo
            .expect_append()
            .times(1)
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("store down")) }));

        let usecase = ActivityTrackingUseCase::new(Arc::new(activity_repo));

        // Must not panic or surface the error.
        usecase
            .record(Uuid::new_v4(), ActivityType::Login, true, json!({}))
            .await;
    }

    #[tokio::test]
    async fn recent_activity_uses_default_limit() {
        let user_id = Uuid::new_v4();

        let mut activity_repo = MockActivityRepository::new();
        activity_repo
            .expect_recent_by_user()
            .with(eq(user_id), eq(RECENT_ACTIVITY_LIMIT))
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase = ActivityTrackingUseCase::new(Arc::new(activity_repo));

        let entries = usecase.recent_activity(user_id).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn recent_logins_use_default_limit() {
        let user_id = Uuid::new_v4();

        let mut activity_repo = MockActivityRepository::new();
        activity_repo
            .expect_recent_login_attempts_by_user()
            .with(eq(user_id), eq(RECENT_LOGIN_LIMIT))
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase = ActivityTrackingUseCase::new(Arc::new(activity_repo));

        let entries = usecase.recent_login_attempts(user_id).await.unwrap();
        assert!(entries.is_empty());
    }
}
