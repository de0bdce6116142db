use serde::Serialize;

use crate::entities::{Date, Role, User, UserId};
use crate::usecases::user::{login, me, register};

/// Public part of a user. The password hash never leaves the store layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: Date,
}

impl From<User> for UserView {
    fn from(
        User {
            id,
            username,
            email,
            role,
            created_at,
            ..
        }: User,
    ) -> Self {
        Self {
            id,
            username,
            email,
            role,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthView {
    pub token: String,
    pub user: UserView,
}

impl From<register::Output> for AuthView {
    fn from(register::Output { user, token }: register::Output) -> Self {
        Self {
            token,
            user: user.into(),
        }
    }
}

impl From<login::Output> for AuthView {
    fn from(login::Output { user, token }: login::Output) -> Self {
        Self {
            token,
            user: user.into(),
        }
    }
}

impl From<me::Output> for UserView {
    fn from(me::Output { user }: me::Output) -> Self { user.into() }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn hash_is_not_rendered() {
        let user = User {
            id: Uuid::new_v4().into(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Member,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserView::from(user)).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["role"], "member");
        assert!(json.get("createdAt").is_some());
    }
}
