//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::roles::Role;
use trailhead_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- this struct deliberately does NOT implement
/// `Serialize`, so it can never leak into an API response. Use
/// [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub photo: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub password_hash: String,
    pub password_changed_at: Option<Timestamp>,
    pub password_reset_hash: Option<String>,
    pub password_reset_expires: Option<Timestamp>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether the password was changed after a token issued at `token_iat`
    /// (seconds since the Unix epoch). Such tokens are stale and must be
    /// rejected.
    pub fn changed_password_after(&self, token_iat: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => changed_at.timestamp() > token_iat,
            None => false,
        }
    }
}

/// Safe user representation for API responses (no password or reset fields).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub photo: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub active: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            photo: user.photo.clone(),
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is hashed by the caller before
/// this struct is built; plaintext never reaches the repository.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

/// DTO for admin updates to a user. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            photo: "default.jpg".to_string(),
            role: Role::User,
            password_hash: "$argon2id$stub".to_string(),
            password_changed_at: None,
            password_reset_hash: None,
            password_reset_expires: None,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn never_changed_password_is_not_stale() {
        let user = sample_user();
        assert!(!user.changed_password_after(0));
        assert!(!user.changed_password_after(i64::MAX));
    }

    #[test]
    fn token_issued_before_change_is_stale() {
        let mut user = sample_user();
        let changed_at = chrono::Utc::now();
        user.password_changed_at = Some(changed_at);

        let before = changed_at.timestamp() - 60;
        let after = changed_at.timestamp() + 60;
        assert!(user.changed_password_after(before));
        assert!(!user.changed_password_after(after));
    }

    #[test]
    fn response_serialization_has_no_password_fields() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("email"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("password_reset_hash"));
        assert_eq!(json["role"], "user");
    }
}
