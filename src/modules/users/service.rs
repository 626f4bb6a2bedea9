use anyhow::anyhow;
use gatehouse_core::{AppError, PageQuery, spawn_hash_password, spawn_verify_password};
use gatehouse_db::{RepositoryError, UserRepository};
use gatehouse_models::{Principal, UserListResponse, UserView};
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::aggregator::aggregate_page;

/// Maps a missing row to a 404 with `message`; other failures keep their
/// usual classification.
fn not_found_as(message: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |err| match err {
        RepositoryError::NotFound => AppError::not_found(anyhow!(message)),
        other => AppError::from(other),
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(repository))]
    pub async fn get_user(repository: &dyn UserRepository, id: &str) -> Result<UserView, AppError> {
        repository
            .find_by_id(id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| AppError::not_found(anyhow!("user not found")))
    }

    #[instrument(skip(repository))]
    pub async fn list_users(
        repository: &dyn UserRepository,
        query: &PageQuery,
        deadline: Option<Instant>,
    ) -> Result<UserListResponse, AppError> {
        let page = query.to_page_request();
        let result = aggregate_page(repository, &page, deadline).await?;
        Ok(UserListResponse {
            users: result.items,
            total_page: result.total_pages,
            per_page: page.limit,
            page_number: query.page_number(),
        })
    }

    /// Self only.
    #[instrument(skip(repository, principal), fields(principal.id = %principal.id))]
    pub async fn update_email(
        repository: &dyn UserRepository,
        principal: &Principal,
        id: &str,
        email: &str,
    ) -> Result<UserView, AppError> {
        if principal.id != id {
            return Err(AppError::forbidden("cannot update another user"));
        }
        let record = repository
            .update_email(id, email)
            .await
            .map_err(not_found_as("user not found"))?;
        Ok(UserView::from(record))
    }

    /// Activation is admin-only. Deactivation is allowed on oneself, or on
    /// anyone by an admin.
    #[instrument(skip(repository, principal), fields(principal.id = %principal.id))]
    pub async fn update_status(
        repository: &dyn UserRepository,
        principal: &Principal,
        id: &str,
        is_active: bool,
    ) -> Result<(), AppError> {
        if !principal.is_admin() {
            if is_active {
                return Err(AppError::forbidden("only admin can activate a user"));
            }
            if principal.id != id {
                return Err(AppError::forbidden(
                    "you must be admin to deactivate other users than yourself",
                ));
            }
        }

        repository
            .update_status(id, is_active)
            .await
            .map_err(not_found_as("user to be set status not found"))?;
        info!(user.id = %id, is_active, "User status updated");
        Ok(())
    }

    /// Self only, and the old password must match the stored hash.
    #[instrument(
        skip(repository, principal, old_password, new_password),
        fields(principal.id = %principal.id)
    )]
    pub async fn change_password(
        repository: &dyn UserRepository,
        principal: &Principal,
        id: &str,
        old_password: String,
        new_password: String,
        bcrypt_cost: u32,
    ) -> Result<(), AppError> {
        if principal.id != id {
            return Err(AppError::forbidden("cannot change another user's password"));
        }

        let record = repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow!("user to be updated password not found"))
            })?;

        if !spawn_verify_password(old_password, record.password_hash).await? {
            return Err(AppError::unauthorized("old password is not correct"));
        }

        let password_hash = spawn_hash_password(new_password, bcrypt_cost).await?;
        repository
            .update_password(id, &password_hash)
            .await
            .map_err(not_found_as("user to be updated password not found"))?;
        info!(user.id = %id, "Password changed");
        Ok(())
    }

    /// Admin-only (enforced by the route), and never oneself.
    #[instrument(skip(repository, principal), fields(principal.id = %principal.id))]
    pub async fn delete_user(
        repository: &dyn UserRepository,
        principal: &Principal,
        id: &str,
    ) -> Result<(), AppError> {
        if principal.id == id {
            return Err(AppError::forbidden("admin cannot self-delete"));
        }
        repository
            .delete(id)
            .await
            .map_err(not_found_as("user to be deleted not found"))?;
        info!(user.id = %id, "User deleted");
        Ok(())
    }
}
