//! # View Access Rules
//!
//! Role-based gating for the application's views. Violations never error;
//! they resolve to the view the user should land on instead.

use shared::{Supervisor, UserRole};

/// The navigable views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Membership,
    Login,
    SupervisorPortal,
    AdminPanel,
}

impl View {
    /// Views reachable without logging in
    pub fn is_public(&self) -> bool {
        matches!(self, View::Dashboard | View::Membership | View::Login)
    }

    /// Roles allowed on a protected view; `None` admits any authenticated
    /// user
    pub fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            View::AdminPanel => Some(&[UserRole::Admin]),
            _ => None,
        }
    }
}

/// Where a navigation request actually lands.
///
/// Unauthenticated users reach only public views; a protected view sends
/// them to Login. An authenticated user outside a view's allowed-role set
/// lands on the public Dashboard. A logged-in user on Login is forwarded to
/// their portal.
pub fn resolve(current_user: Option<&Supervisor>, requested: View) -> View {
    if requested == View::Login {
        return match current_user {
            Some(user) if user.role == Some(UserRole::Admin) => View::AdminPanel,
            Some(_) => View::SupervisorPortal,
            None => View::Login,
        };
    }

    if requested.is_public() {
        return requested;
    }

    let Some(user) = current_user else {
        return View::Login;
    };

    match requested.allowed_roles() {
        Some(roles) => {
            if user.role.map_or(false, |role| roles.contains(&role)) {
                requested
            } else {
                View::Dashboard
            }
        }
        None => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;

    fn with_role(role: UserRole) -> Supervisor {
        let mut user = seed::supervisors().remove(2);
        user.role = Some(role);
        user
    }

    #[test]
    fn test_anonymous_users_reach_only_public_views() {
        assert_eq!(resolve(None, View::Dashboard), View::Dashboard);
        assert_eq!(resolve(None, View::Membership), View::Membership);
        assert_eq!(resolve(None, View::Login), View::Login);
        assert_eq!(resolve(None, View::SupervisorPortal), View::Login);
        assert_eq!(resolve(None, View::AdminPanel), View::Login);
    }

    #[test]
    fn test_admin_panel_requires_admin_role() {
        let coach = with_role(UserRole::Coach);
        assert_eq!(resolve(Some(&coach), View::AdminPanel), View::Dashboard);

        let admin = with_role(UserRole::Admin);
        assert_eq!(resolve(Some(&admin), View::AdminPanel), View::AdminPanel);
    }

    #[test]
    fn test_any_authenticated_role_reaches_the_portal() {
        for role in [UserRole::Manager, UserRole::Coach, UserRole::Keeper] {
            let user = with_role(role);
            assert_eq!(
                resolve(Some(&user), View::SupervisorPortal),
                View::SupervisorPortal
            );
        }
    }

    #[test]
    fn test_logged_in_users_skip_the_login_view() {
        let admin = with_role(UserRole::Admin);
        assert_eq!(resolve(Some(&admin), View::Login), View::AdminPanel);

        let coach = with_role(UserRole::Coach);
        assert_eq!(resolve(Some(&coach), View::Login), View::SupervisorPortal);
    }
}
