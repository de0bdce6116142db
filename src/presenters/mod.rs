//! JSON views of usecase outputs.
//!
//! Stored documents only hold user ids; views expand each reference to
//! `{id, username}` from the usernames the interactor looked up.

pub mod blog;
pub mod music;
pub mod user;

use serde::Serialize;

use crate::entities::UserId;
use crate::usecases::Usernames;

/// A user reference. `username` is `null` once the user no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRef {
    pub id: UserId,
    pub username: Option<String>,
}

impl UserRef {
    pub(crate) fn resolve(id: UserId, usernames: &Usernames) -> Self {
        Self {
            id,
            username: usernames.get(&id).cloned(),
        }
    }
}

/// `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub message: String,
}

impl MessageView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
