//! # Gatehouse CLI
//!
//! Administrative operations that have no HTTP surface. Public registration
//! always yields `role=user`, so admins are created here.

use anyhow::{Context, bail};
use gatehouse_core::spawn_hash_password;
use gatehouse_core::validation::{validate_email_shape, validate_password_strength};
use gatehouse_db::{RepositoryError, UserRepository};
use gatehouse_models::{NewUser, Role, UserRecord};

/// Validates the credentials and inserts an active admin.
pub async fn create_admin(
    repository: &dyn UserRepository,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<UserRecord> {
    let email = email.trim();
    let password = password.trim();

    if let Err(e) = validate_email_shape(email) {
        bail!("{}", e.message.unwrap_or_default());
    }
    if let Err(e) = validate_password_strength(password) {
        bail!("{}", e.message.unwrap_or_default());
    }

    let password_hash = spawn_hash_password(password.to_string(), bcrypt_cost)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.error))?;

    let admin = NewUser {
        email: email.to_string(),
        password_hash,
        role: Role::Admin,
        is_active: true,
    };

    match repository.insert(admin).await {
        Ok(record) => Ok(record),
        Err(RepositoryError::Conflict) => bail!("a user with email {email} already exists"),
        Err(e) => Err(e).context("failed to insert admin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_db::MemoryUserRepository;

    #[tokio::test]
    async fn test_create_admin() {
        let repo = MemoryUserRepository::new();
        let admin = create_admin(&repo, " root@example.com ", "Adm1n!pass", 4)
            .await
            .unwrap();
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_active);
        assert_ne!(admin.password_hash, "Adm1n!pass");
    }

    #[tokio::test]
    async fn test_create_admin_rejects_weak_password() {
        let repo = MemoryUserRepository::new();
        let err = create_admin(&repo, "root@example.com", "admin", 4)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 8"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_create_admin_duplicate_email() {
        let repo = MemoryUserRepository::new();
        create_admin(&repo, "root@example.com", "Adm1n!pass", 4)
            .await
            .unwrap();
        let err = create_admin(&repo, "root@example.com", "Adm1n!pass", 4)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
