use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::entities::{BlogPost, Comment, Role};
use crate::error::{AppError, Result};
use crate::repositories::{PostRepository, UserRepository};
use crate::usecases::blog::{comment, create, delete, get, like, list};
use crate::utils::{non_blank, AlsoChain, LetChain};

pub const DEFAULT_POST_IMAGE: &str = "https://via.placeholder.com/600x400?text=Blog+Post+Image";

pub struct PostListInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl list::Usecase for PostListInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: list::Input) -> Result<list::Output> {
        tracing::trace!("input - {:?}", data);

        let posts = self.post_repository.finds().await.map_err(post_err_fmt)?;
        let usernames = usernames(&*self.user_repository, post_refs(&posts)).await?;

        list::Output { posts, usernames }
            .also_(|o| tracing::trace!("output - {} posts", o.posts.len()))
            .let_(Ok)
    }
}

pub struct PostGetInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl get::Usecase for PostGetInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: get::Input) -> Result<get::Output> {
        tracing::trace!("input - {:?}", data);

        let post = self
            .post_repository
            .find(data.post_id)
            .await
            .map_err(post_err_fmt)?;
        let usernames = usernames(&*self.user_repository, post_refs([&post])).await?;

        get::Output { post, usernames }.let_(Ok)
    }
}

pub struct PostCreateInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl create::Usecase for PostCreateInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: create::Input) -> Result<create::Output> {
        tracing::trace!("input - {:?}", data);

        let create::Input {
            title,
            content,
            excerpt,
            image_url,
            tags,
            music_track,
            author,
        } = data;

        let (title, content, excerpt) = match (non_blank(title), non_blank(content), non_blank(excerpt)) {
            (Some(t), Some(c), Some(e)) => (t, c, e),
            _ =>
                return Err(AppError::Validation(
                    "Please provide all required fields (title, content, excerpt)".to_string(),
                )),
        };

        let now = Utc::now();
        let new_post = BlogPost {
            id: ::uuid::Uuid::new_v4().into(),
            title,
            content,
            excerpt,
            image_url: non_blank(image_url).unwrap_or_else(|| DEFAULT_POST_IMAGE.to_string()),
            tags: tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|t| non_blank(Some(t)))
                .collect(),
            music_track,
            author,
            likes: HashSet::new(),
            comments: vec![],
            created_at: now,
            updated_at: now,
        };

        let can_insert = self
            .post_repository
            .insert(new_post.clone())
            .await
            .map_err(post_err_fmt)?;

        if !can_insert {
            return Err(AppError::Internal(::anyhow::anyhow!(
                "post id collision: {}",
                new_post.id
            )));
        }

        let usernames = usernames(&*self.user_repository, HashSet::from([author])).await?;

        create::Output {
            post: new_post,
            usernames,
        }
        .also_(|o| tracing::trace!("output - {:?}", o))
        .let_(Ok)
    }
}

pub struct PostDeleteInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
}
#[async_trait]
impl delete::Usecase for PostDeleteInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: delete::Input) -> Result<delete::Output> {
        tracing::trace!("input - {:?}", data);

        let delete::Input {
            post_id,
            requester,
            role,
        } = data;

        let post = self
            .post_repository
            .find(post_id)
            .await
            .map_err(post_err_fmt)?;

        if post.author != requester && role != Role::Admin {
            tracing::info!(%post_id, %requester, "delete refused");
            return Err(AppError::Forbidden("Not authorized to delete this post".to_string()));
        }

        self.post_repository
            .delete(post_id)
            .await
            .map_err(post_err_fmt)?
            .let_(|post| delete::Output { post })
            .let_(Ok)
    }
}

pub struct PostLikeInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl like::Usecase for PostLikeInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: like::Input) -> Result<like::Output> {
        tracing::trace!("input - {:?}", data);

        let like::Input { post_id, user_id } = data;

        let liked = toggle_like(&*self.post_repository, post_id, user_id)
            .await
            .map_err(post_err_fmt)?;
        let post = self
            .post_repository
            .find(post_id)
            .await
            .map_err(post_err_fmt)?;
        let usernames = usernames(&*self.user_repository, post_refs([&post])).await?;

        like::Output {
            post,
            usernames,
            liked,
        }
        .let_(Ok)
    }
}

pub struct PostCommentInteractor {
    pub post_repository: Arc<dyn PostRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl comment::Usecase for PostCommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: comment::Input) -> Result<comment::Output> {
        tracing::trace!("input - {:?}", data);

        let comment::Input {
            post_id,
            user_id,
            text,
        } = data;

        let text = non_blank(text)
            .ok_or_else(|| AppError::Validation("Comment text is required".to_string()))?;

        let new_comment = Comment {
            id: ::uuid::Uuid::new_v4().into(),
            author: user_id,
            text,
            created_at: Utc::now(),
        };

        self.post_repository
            .push_comment(post_id, new_comment)
            .await
            .map_err(post_err_fmt)?;

        let post = self
            .post_repository
            .find(post_id)
            .await
            .map_err(post_err_fmt)?;
        let usernames = usernames(&*self.user_repository, post_refs([&post])).await?;

        comment::Output { post, usernames }.let_(Ok)
    }
}
