use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::user_dto::{AddUserRequest, UpdateUserRequest};
use crate::models::{EntityId, SessionContext, UserProfile, UserRole};
use crate::repositories::AccountRepository;
use crate::utils::errors::{forbidden_error, AppResult};

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_user(&self, session: &SessionContext, id: EntityId) -> AppResult<UserProfile> {
        require_self_or_admin(session, id, "view this user")?;
        self.repo.get_user(session, id).await
    }

    pub async fn update_user(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: UpdateUserRequest,
    ) -> AppResult<UserProfile> {
        require_self_or_admin(session, id, "update this user")?;
        update.validate()?;

        let profile = self.repo.update_user(session, id, &update).await?;
        info!("✏️ User {} updated", id);
        Ok(profile)
    }

    pub async fn add_user(&self, session: &SessionContext, user: AddUserRequest) -> AppResult<UserProfile> {
        session.require_role(&[UserRole::Admin], "add a user")?;
        user.validate()?;

        let profile = self.repo.add_user(session, &user).await?;
        info!("👤 {} account created for {}", user.role, user.email);
        Ok(profile)
    }

    pub async fn list_users(&self, session: &SessionContext) -> AppResult<Vec<UserProfile>> {
        session.require_role(&[UserRole::Admin], "list users")?;
        self.repo.list_users(session).await
    }
}

fn require_self_or_admin(session: &SessionContext, id: EntityId, operation: &str) -> AppResult<()> {
    if session.is_admin() || session.user_id == id {
        Ok(())
    } else {
        Err(forbidden_error(operation, "only the account owner or an admin may do this"))
    }
}
