pub mod blog;
pub mod music;
pub mod user;

use std::collections::HashSet;
use std::fmt::Debug;

use anyhow::anyhow;

use crate::entities::{BlogPost, UserId};
use crate::error::{AppError, Result};
use crate::repositories::{
    LikeRepository, RepositoryError, Result as RepoResult, UserRepository,
};
use crate::usecases::Usernames;
use crate::utils::LetChain;

/// Upper bound on flip attempts when other requests keep flipping the same like.
const TOGGLE_ATTEMPTS: usize = 16;

fn user_err_fmt(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
        e => AppError::Internal(anyhow!("repository error: {}", e)),
    }
}

fn music_err_fmt(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Music not found".to_string()),
        e => AppError::Internal(anyhow!("repository error: {}", e)),
    }
}

fn post_err_fmt(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Post not found".to_string()),
        e => AppError::Internal(anyhow!("repository error: {}", e)),
    }
}

/// Flips `user_id`'s membership in a like-set and reports the new state.
///
/// Adding and removing are conditional store primitives, so a toggle never
/// decides from a stale read: if both report "nothing changed", another
/// request flipped the same membership in between and we try again.
pub(crate) async fn toggle_like<I, R>(repo: &R, id: I, user_id: UserId) -> RepoResult<bool>
where
    I: Copy + Debug + Send + Sync + 'static,
    R: LikeRepository<I> + ?Sized + Sync,
{
    for attempt in 0..TOGGLE_ATTEMPTS {
        if repo.insert_liked(id, user_id).await? {
            return Ok(true);
        }
        if repo.delete_liked(id, user_id).await? {
            return Ok(false);
        }

        tracing::debug!(?id, %user_id, attempt, "like flipped underneath, retrying");
    }

    Err(RepositoryError::Internal(anyhow!(
        "like on {:?} kept changing after {} attempts",
        id,
        TOGGLE_ATTEMPTS
    )))
}

pub(crate) async fn usernames<R>(repo: &R, ids: HashSet<UserId>) -> Result<Usernames>
where R: UserRepository + ?Sized + Sync {
    if ids.is_empty() {
        return Ok(Usernames::new());
    }

    repo.finds(ids)
        .await
        .map_err(user_err_fmt)?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect::<Usernames>()
        .let_(Ok)
}

pub(crate) fn post_refs<'a>(posts: impl IntoIterator<Item = &'a BlogPost>) -> HashSet<UserId> {
    posts
        .into_iter()
        .flat_map(|p| {
            ::std::iter::once(p.author)
                .chain(p.likes.iter().copied())
                .chain(p.comments.iter().map(|c| c.author))
        })
        .collect()
}

/// Runs CPU-heavy work (password hashing) off the async workers.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> ::anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow!(e)))?
        .map_err(AppError::Internal)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::auth::{PasswordService, TokenService};
    use crate::entities::{BlogPost, MusicTrack, Role, User, UserId};
    use crate::repositories::memory::InMemoryRepository;
    use crate::repositories::UserRepository;

    pub struct Fixture {
        pub users: Arc<InMemoryRepository<User>>,
        pub musics: Arc<InMemoryRepository<MusicTrack>>,
        pub posts: Arc<InMemoryRepository<BlogPost>>,
        pub passwords: PasswordService,
        pub tokens: TokenService,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                users: Arc::new(InMemoryRepository::new()),
                musics: Arc::new(InMemoryRepository::new()),
                posts: Arc::new(InMemoryRepository::new()),
                passwords: PasswordService::with_cost(1024, 1, 1).unwrap(),
                tokens: TokenService::new(b"test-secret", Duration::hours(1)),
            }
        }

        pub async fn user(&self, username: &str, role: Role) -> UserId {
            let user = User {
                id: Uuid::new_v4().into(),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: String::new(),
                role,
                created_at: Utc::now(),
            };
            let id = user.id;
            assert!(self.users.insert(user).await.unwrap());

            id
        }
    }
}
