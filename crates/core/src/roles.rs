//! Account roles and the access policies built on them.
//!
//! Roles are stored as lowercase kebab-case text in `users.role` and travel
//! the same way on the wire. Route guards in the API crate check the policy
//! predicates here rather than comparing raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Regular customer account. The default for new signups.
    User,
    /// Tour guide staff.
    Guide,
    /// Senior guide staff, may manage the tour catalog.
    LeadGuide,
    /// Full administrative access.
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }

    /// May create, edit, and delete tours.
    pub fn can_manage_tours(self) -> bool {
        matches!(self, Role::Admin | Role::LeadGuide)
    }

    /// May administer user accounts.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// May post new reviews. Staff accounts cannot review their own tours.
    pub fn can_write_reviews(self) -> bool {
        matches!(self, Role::User)
    }

    /// May edit or delete existing reviews.
    pub fn can_moderate_reviews(self) -> bool {
        matches!(self, Role::User | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "guide" => Ok(Role::Guide),
            "lead-guide" => Ok(Role::LeadGuide),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

// Used by sqlx to decode the `users.role` TEXT column.
impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_roles() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("guide".parse::<Role>().unwrap(), Role::Guide);
        assert_eq!("lead-guide".parse::<Role>().unwrap(), Role::LeadGuide);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        // Wire form is kebab-case, not snake_case.
        assert!("lead_guide".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for role in [Role::User, Role::Guide, Role::LeadGuide, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Role::LeadGuide).unwrap(),
            "\"lead-guide\""
        );
        let parsed: Role = serde_json::from_str("\"lead-guide\"").unwrap();
        assert_eq!(parsed, Role::LeadGuide);
    }

    #[test]
    fn tour_management_policy() {
        assert!(Role::Admin.can_manage_tours());
        assert!(Role::LeadGuide.can_manage_tours());
        assert!(!Role::Guide.can_manage_tours());
        assert!(!Role::User.can_manage_tours());
    }

    #[test]
    fn user_management_policy() {
        assert!(Role::Admin.can_manage_users());
        assert!(!Role::LeadGuide.can_manage_users());
        assert!(!Role::User.can_manage_users());
    }

    #[test]
    fn review_policies() {
        assert!(Role::User.can_write_reviews());
        assert!(!Role::Admin.can_write_reviews());
        assert!(!Role::Guide.can_write_reviews());

        assert!(Role::User.can_moderate_reviews());
        assert!(Role::Admin.can_moderate_reviews());
        assert!(!Role::Guide.can_moderate_reviews());
        assert!(!Role::LeadGuide.can_moderate_reviews());
    }
}
