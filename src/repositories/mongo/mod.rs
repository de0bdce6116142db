use std::collections::HashSet;

use async_trait::async_trait;
use bson::{doc, Bson};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::Instrument;

use super::{
    LikeRepository, MusicQuery, MusicRepository, PostRepository, RepositoryError, Result,
    UserRepository,
};
use crate::entities::{BlogPost, Comment, MusicId, MusicTrack, PostId, User, UserId};
use crate::utils::LetChain;

mod converters;
mod helpers;
mod models;
mod type_convert;

use converters::{convert_404_or, convert_model, convert_repo_err, try_unique_check};
use helpers::{get_one, initialize_coll, modify_set, push_one, ModifyOpTy};
use models::{MongoCommentModel, MongoMusicModel, MongoPostModel, MongoUserModel};

pub struct MongoUserRepository {
    coll: Collection<MongoUserModel>,
}

impl MongoUserRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll("user", &db, vec![
            doc! { "name": "unique_username", "key": { "username": 1 }, "unique": true },
            doc! { "name": "unique_email", "key": { "email": 1 }, "unique": true },
        ])
        .await?;

        Ok(Self {
            coll: db.collection("user"),
        })
    }
}

pub struct MongoMusicRepository {
    coll: Collection<MongoMusicModel>,
}

impl MongoMusicRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll("music", &db, vec![
            doc! {
                "name": "unique_title_artist",
                "key": { "title": 1, "artist": 1 },
                "unique": true
            },
            doc! {
                "name": "text_title_artist",
                "key": { "title": "text", "artist": "text" }
            },
        ])
        .await?;

        Ok(Self {
            coll: db.collection("music"),
        })
    }
}

pub struct MongoPostRepository {
    coll: Collection<MongoPostModel>,
}

impl MongoPostRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll("post", &db, vec![]).await?;

        Ok(Self {
            coll: db.collection("post"),
        })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, item: User) -> Result<bool> {
        let model: MongoUserModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: UserId) -> Result<User> {
        get_one(&self.coll, id.to_string()).await?.let_(convert_model)
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        self.coll
            .find_one(doc! { "email": email }, None)
            .instrument(tracing::trace_span!("find_one"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .let_(convert_model)
    }

    async fn finds(&self, ids: HashSet<UserId>) -> Result<Vec<User>> {
        let ids = ids.iter().map(|i| i.to_string()).collect::<Vec<_>>();

        self.coll
            .find(doc! { "id": { "$in": ids } }, None)
            .instrument(tracing::trace_span!("find"))
            .await
            .let_(convert_repo_err)?
            .try_collect::<Vec<_>>()
            .await
            .let_(convert_repo_err)?
            .into_iter()
            .map(convert_model)
            .collect()
    }
}

#[async_trait]
impl LikeRepository<MusicId> for MongoMusicRepository {
    async fn insert_liked(&self, id: MusicId, user_id: UserId) -> Result<bool> {
        modify_set(
            "likes",
            &self.coll,
            id.to_string(),
            user_id.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_liked(&self, id: MusicId, user_id: UserId) -> Result<bool> {
        modify_set(
            "likes",
            &self.coll,
            id.to_string(),
            user_id.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }
}

#[async_trait]
impl MusicRepository for MongoMusicRepository {
    async fn insert(&self, item: MusicTrack) -> Result<bool> {
        let model: MongoMusicModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: MusicId) -> Result<MusicTrack> {
        get_one(&self.coll, id.to_string()).await?.let_(convert_model)
    }

    async fn finds(
        &self,
        MusicQuery {
            language,
            text,
            sort,
            limit,
        }: MusicQuery,
    ) -> Result<Vec<MusicTrack>> {
        let mut filter = doc! {};
        if let Some(language) = language {
            filter.insert("language", language.as_str());
        }
        if let Some(text) = text {
            filter.insert("$text", doc! { "$search": text });
        }

        let options = FindOptions::builder()
            .sort(doc! { sort.field(): -1 })
            .limit(limit.map(|l| l as i64))
            .build();

        self.coll
            .find(filter, options)
            .instrument(tracing::trace_span!("find"))
            .await
            .let_(convert_repo_err)?
            .try_collect::<Vec<_>>()
            .await
            .let_(convert_repo_err)?
            .into_iter()
            .map(convert_model)
            .collect()
    }

    async fn increment_plays(&self, id: MusicId) -> Result<u64> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let track: MusicTrack = self
            .coll
            .find_one_and_update(
                doc! { "id": id.to_string() },
                doc! {
                    "$inc": { "plays": 1_i64 },
                    "$set": { "updated_at": bson::DateTime::from_chrono(Utc::now()) }
                },
                options,
            )
            .instrument(tracing::trace_span!("find_one_and_update"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .let_(convert_model)?;

        Ok(track.plays)
    }
}

#[async_trait]
impl LikeRepository<PostId> for MongoPostRepository {
    async fn insert_liked(&self, id: PostId, user_id: UserId) -> Result<bool> {
        modify_set(
            "likes",
            &self.coll,
            id.to_string(),
            user_id.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_liked(&self, id: PostId, user_id: UserId) -> Result<bool> {
        modify_set(
            "likes",
            &self.coll,
            id.to_string(),
            user_id.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, item: BlogPost) -> Result<bool> {
        let model: MongoPostModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: PostId) -> Result<BlogPost> {
        get_one(&self.coll, id.to_string()).await?.let_(convert_model)
    }

    async fn finds(&self) -> Result<Vec<BlogPost>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        self.coll
            .find(doc! {}, options)
            .instrument(tracing::trace_span!("find"))
            .await
            .let_(convert_repo_err)?
            .try_collect::<Vec<_>>()
            .await
            .let_(convert_repo_err)?
            .into_iter()
            .map(convert_model)
            .collect()
    }

    async fn push_comment(&self, id: PostId, comment: Comment) -> Result<()> {
        let model: MongoCommentModel = comment.into();
        let item: Bson = bson::to_bson(&model)
            .map_err(|e| RepositoryError::Internal(::anyhow::anyhow!(e)))?;

        push_one("comments", &self.coll, id.to_string(), item).await
    }

    async fn delete(&self, id: PostId) -> Result<BlogPost> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .let_(convert_model)
    }
}
