use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use bson::DateTime;

use super::models::{
    MongoCommentModel, MongoMusicModel, MongoPostModel, MongoTrackRefModel, MongoUserModel,
};
use crate::entities::{BlogPost, Comment, MusicTrack, TrackRef, User};

fn parse<T>(raw: &str) -> ::anyhow::Result<T>
where
    T: FromStr,
    T::Err: ::std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("malformed stored value: {}", raw))
}

fn parse_set<T>(raw: &[String]) -> ::anyhow::Result<HashSet<T>>
where
    T: FromStr + Eq + Hash,
    T::Err: ::std::error::Error + Send + Sync + 'static,
{
    raw.iter().map(|s| parse(s)).collect()
}

fn to_strings<T: ToString>(set: &HashSet<T>) -> Vec<String> {
    set.iter().map(|i| i.to_string()).collect()
}

impl From<User> for MongoUserModel {
    fn from(
        User {
            id,
            username,
            email,
            password_hash,
            role,
            created_at,
        }: User,
    ) -> Self {
        Self {
            id: id.to_string(),
            username,
            email,
            password_hash,
            role: role.as_str().to_string(),
            created_at: DateTime::from_chrono(created_at),
        }
    }
}

impl TryFrom<MongoUserModel> for User {
    type Error = ::anyhow::Error;

    fn try_from(m: MongoUserModel) -> ::anyhow::Result<Self> {
        Ok(Self {
            id: parse(&m.id)?,
            username: m.username,
            email: m.email,
            password_hash: m.password_hash,
            role: m.role.parse()?,
            created_at: m.created_at.to_chrono(),
        })
    }
}

impl From<MusicTrack> for MongoMusicModel {
    fn from(t: MusicTrack) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title,
            artist: t.artist,
            language: t.language.as_str().to_string(),
            image_url: t.image_url,
            audio_url: t.audio_url,
            likes: to_strings(&t.likes),
            plays: t.plays as i64,
            added_by: t.added_by.to_string(),
            created_at: DateTime::from_chrono(t.created_at),
            updated_at: DateTime::from_chrono(t.updated_at),
        }
    }
}

impl TryFrom<MongoMusicModel> for MusicTrack {
    type Error = ::anyhow::Error;

    fn try_from(m: MongoMusicModel) -> ::anyhow::Result<Self> {
        Ok(Self {
            id: parse(&m.id)?,
            title: m.title,
            artist: m.artist,
            language: m.language.parse()?,
            image_url: m.image_url,
            audio_url: m.audio_url,
            likes: parse_set(&m.likes)?,
            plays: u64::try_from(m.plays).map_err(|_| anyhow!("negative plays: {}", m.plays))?,
            added_by: parse(&m.added_by)?,
            created_at: m.created_at.to_chrono(),
            updated_at: m.updated_at.to_chrono(),
        })
    }
}

impl From<Comment> for MongoCommentModel {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id.to_string(),
            author: c.author.to_string(),
            text: c.text,
            created_at: DateTime::from_chrono(c.created_at),
        }
    }
}

impl TryFrom<MongoCommentModel> for Comment {
    type Error = ::anyhow::Error;

    fn try_from(m: MongoCommentModel) -> ::anyhow::Result<Self> {
        Ok(Self {
            id: parse(&m.id)?,
            author: parse(&m.author)?,
            text: m.text,
            created_at: m.created_at.to_chrono(),
        })
    }
}

impl From<TrackRef> for MongoTrackRefModel {
    fn from(
        TrackRef {
            title,
            artist,
            url,
            language,
        }: TrackRef,
    ) -> Self {
        Self {
            title,
            artist,
            url,
            language,
        }
    }
}

impl From<MongoTrackRefModel> for TrackRef {
    fn from(
        MongoTrackRefModel {
            title,
            artist,
            url,
            language,
        }: MongoTrackRefModel,
    ) -> Self {
        Self {
            title,
            artist,
            url,
            language,
        }
    }
}

impl From<BlogPost> for MongoPostModel {
    fn from(p: BlogPost) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title,
            content: p.content,
            excerpt: p.excerpt,
            image_url: p.image_url,
            tags: p.tags,
            music_track: p.music_track.map(Into::into),
            author: p.author.to_string(),
            likes: to_strings(&p.likes),
            comments: p.comments.into_iter().map(Into::into).collect(),
            created_at: DateTime::from_chrono(p.created_at),
            updated_at: DateTime::from_chrono(p.updated_at),
        }
    }
}

impl TryFrom<MongoPostModel> for BlogPost {
    type Error = ::anyhow::Error;

    fn try_from(m: MongoPostModel) -> ::anyhow::Result<Self> {
        Ok(Self {
            id: parse(&m.id)?,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            image_url: m.image_url,
            tags: m.tags,
            music_track: m.music_track.map(Into::into),
            author: parse(&m.author)?,
            likes: parse_set(&m.likes)?,
            comments: m
                .comments
                .into_iter()
                .map(Comment::try_from)
                .collect::<::anyhow::Result<_>>()?,
            created_at: m.created_at.to_chrono(),
            updated_at: m.updated_at.to_chrono(),
        })
    }
}
