use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;

use crate::entities::{
    BlogPost, Comment, Language, MusicId, MusicTrack, PostId, User, UserId,
};

pub(crate) mod memory;
pub(crate) mod mongo;

pub type Result<T> = ::std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository {
    /// `false` when the username or the email is already taken.
    async fn insert(&self, item: User) -> Result<bool>;

    async fn find(&self, id: UserId) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<User>;
    async fn finds(&self, ids: HashSet<UserId>) -> Result<Vec<User>>;
}

/// Set semantics on a document's `likes`. Both operations report whether the
/// stored document actually changed.
#[async_trait]
pub trait LikeRepository<I: Send + 'static> {
    async fn insert_liked(&self, id: I, user_id: UserId) -> Result<bool>;
    async fn delete_liked(&self, id: I, user_id: UserId) -> Result<bool>;
}

#[async_trait]
pub trait MusicRepository: LikeRepository<MusicId> {
    /// `false` when the (title, artist) pair already exists.
    async fn insert(&self, item: MusicTrack) -> Result<bool>;

    async fn find(&self, id: MusicId) -> Result<MusicTrack>;
    async fn finds(&self, query: MusicQuery) -> Result<Vec<MusicTrack>>;

    async fn increment_plays(&self, id: MusicId) -> Result<u64>;
}

#[async_trait]
pub trait PostRepository: LikeRepository<PostId> {
    async fn insert(&self, item: BlogPost) -> Result<bool>;

    async fn find(&self, id: PostId) -> Result<BlogPost>;
    /// Newest first.
    async fn finds(&self) -> Result<Vec<BlogPost>>;

    async fn push_comment(&self, id: PostId, comment: Comment) -> Result<()>;

    async fn delete(&self, id: PostId) -> Result<BlogPost>;
}

#[derive(Debug, Clone, Default)]
pub struct MusicQuery {
    pub language: Option<Language>,
    pub text: Option<String>,
    pub sort: MusicSort,
    pub limit: Option<usize>,
}

/// Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicSort {
    #[default]
    CreatedAt,
    Plays,
    Title,
}

impl MusicSort {
    pub(crate) fn field(&self) -> &'static str {
        match self {
            MusicSort::CreatedAt => "created_at",
            MusicSort::Plays => "plays",
            MusicSort::Title => "title",
        }
    }
}

impl FromStr for MusicSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(MusicSort::CreatedAt),
            "plays" => Ok(MusicSort::Plays),
            "title" => Ok(MusicSort::Title),
            s => Err(anyhow::anyhow!("cannot sort by `{}`", s)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("cannot find object.")]
    NotFound,
    #[error("expected unique object, found non-unique objects (matched: {matched})")]
    NoUnique { matched: u32 },
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}
