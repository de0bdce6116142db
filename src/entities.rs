use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Date = DateTime<Utc>;

macro_rules! id {
    ($n:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $n(pub Uuid);

        impl From<Uuid> for $n {
            fn from(id: Uuid) -> Self { Self(id) }
        }

        impl FromStr for $n {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
        }

        impl fmt::Display for $n {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
        }
    };
}

id!(UserId);
id!(MusicId);
id!(PostId);
id!(CommentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            s => Err(anyhow::anyhow!("unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Hindi,
    English,
    Tamil,
    Telugu,
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Hindi,
        Language::English,
        Language::Tamil,
        Language::Telugu,
        Language::Punjabi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Punjabi => "Punjabi",
        }
    }
}

/// Exact, case-sensitive match on the catalog's language names.
impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .find(|l| l.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("unknown language: {}", s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Plaintext password in transit. Never printed.
#[derive(Clone)]
pub struct Password(pub String);

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Password(***)") }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Date,
}

#[derive(Debug, Clone)]
pub struct MusicTrack {
    pub id: MusicId,
    pub title: String,
    pub artist: String,
    pub language: Language,
    pub image_url: String,
    pub audio_url: String,
    pub likes: HashSet<UserId>,
    pub plays: u64,
    pub added_by: UserId,
    pub created_at: Date,
    pub updated_at: Date,
}

#[derive(Debug, Clone)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub music_track: Option<TrackRef>,
    pub author: UserId,
    pub likes: HashSet<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: Date,
    pub updated_at: Date,
}

/// Loose reference to a track attached to a post; not validated against the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRef {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub author: UserId,
    pub text: String,
    pub created_at: Date,
}
