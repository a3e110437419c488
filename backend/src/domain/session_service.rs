//! # Session Service
//!
//! Authenticates supervisors against the remote store with a local
//! fallback, so login keeps working offline and against mock data.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use shared::Supervisor;

use crate::storage::PersistenceGateway;

/// Why a login attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email is not registered")]
    UnknownEmail,
    #[error("account has no role assigned")]
    NoRoleAssigned,
    #[error("wrong password")]
    WrongPassword,
}

/// Service for authenticating supervisors
pub struct SessionService {
    gateway: Arc<PersistenceGateway>,
}

impl SessionService {
    pub fn new(gateway: Arc<PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Authenticate by email and password.
    ///
    /// The remote store is consulted first so a freshly changed password or
    /// role wins over stale local state; if the store is unreachable or has
    /// no match, the already-loaded local collection is searched instead.
    /// Records without a password accept the fixed default.
    pub async fn login(
        &self,
        local_supervisors: &[Supervisor],
        email: &str,
        password: &str,
    ) -> Result<Supervisor, AuthError> {
        let email = email.trim();

        let candidate = match self.gateway.find_supervisor_by_email(email).await {
            Some(user) => Some(user),
            None => local_supervisors
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned(),
        };

        let user = candidate.ok_or(AuthError::UnknownEmail)?;

        if user.role.is_none() {
            return Err(AuthError::NoRoleAssigned);
        }

        if password != user.login_password() {
            return Err(AuthError::WrongPassword);
        }

        info!("Supervisor {} logged in", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;
    use crate::storage::memory::MemoryRecordStore;
    use crate::storage::store::tables;
    use shared::UserRole;

    fn service_over(store: Arc<MemoryRecordStore>) -> SessionService {
        SessionService::new(Arc::new(PersistenceGateway::new(store)))
    }

    fn local_supervisor(email: &str, password: Option<&str>) -> Supervisor {
        Supervisor {
            id: format!("supervisor::{}", email),
            name: "Local".to_string(),
            role: Some(UserRole::Supervisor),
            phone: "0500000000".to_string(),
            email: email.to_string(),
            image: String::new(),
            signature: None,
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_login_falls_back_to_local_collection() {
        let service = service_over(Arc::new(MemoryRecordStore::unavailable()));
        let local = vec![local_supervisor("a@x.com", Some("123"))];

        // Case-insensitive match against the local collection
        let user = service
            .login(&local, "A@X.com", "123")
            .await
            .expect("Login should fall back to local data");
        assert_eq!(user.id, local[0].id);
    }

    #[tokio::test]
    async fn test_login_accepts_default_password() {
        let service = service_over(Arc::new(MemoryRecordStore::unavailable()));
        let local = vec![local_supervisor("a@x.com", None)];

        let user = service
            .login(&local, "a@x.com", shared::DEFAULT_LOGIN_PASSWORD)
            .await
            .expect("Default password should be accepted");
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_errors() {
        let service = service_over(Arc::new(MemoryRecordStore::unavailable()));
        let mut roleless = local_supervisor("b@x.com", Some("123"));
        roleless.role = None;
        let local = vec![local_supervisor("a@x.com", Some("123")), roleless];

        assert_eq!(
            service.login(&local, "nobody@x.com", "123").await,
            Err(AuthError::UnknownEmail)
        );
        assert_eq!(
            service.login(&local, "b@x.com", "123").await,
            Err(AuthError::NoRoleAssigned)
        );
        assert_eq!(
            service.login(&local, "a@x.com", "wrong").await,
            Err(AuthError::WrongPassword)
        );
    }

    #[tokio::test]
    async fn test_remote_record_wins_over_stale_local_state() {
        let store = Arc::new(MemoryRecordStore::new());
        let mut remote = local_supervisor("a@x.com", Some("rotated"));
        remote.id = "supervisor::remote".to_string();
        store.seed_table(
            tables::SUPERVISORS,
            vec![serde_json::to_value(&remote).unwrap()],
        );
        let service = service_over(store);

        // Local copy still has the old password; the remote one applies
        let local = vec![local_supervisor("a@x.com", Some("old"))];
        assert_eq!(
            service.login(&local, "a@x.com", "old").await,
            Err(AuthError::WrongPassword)
        );
        let user = service
            .login(&local, "a@x.com", "rotated")
            .await
            .expect("Remote password should be accepted");
        assert_eq!(user.id, "supervisor::remote");
    }

    #[tokio::test]
    async fn test_seed_admin_can_log_in() {
        let service = service_over(Arc::new(MemoryRecordStore::unavailable()));
        let local = seed::supervisors();

        let admin = seed::default_admin().unwrap();
        let user = service
            .login(&local, &admin.email, "admin")
            .await
            .expect("Seed admin login should succeed");
        assert_eq!(user.role, Some(UserRole::Admin));
    }
}
