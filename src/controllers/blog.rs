use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::{parse_id, AppState, AuthUser};
use crate::entities::{PostId, TrackRef};
use crate::error::Result;
use crate::presenters::blog::PostView;
use crate::presenters::MessageView;
use crate::usecases::blog::{comment, create, delete, get, like, list};
use crate::utils::LetChain;

const POST_NOT_FOUND: &str = "Post not found";

pub struct BlogController {
    pub list: Arc<dyn list::Usecase + Sync + Send>,
    pub get: Arc<dyn get::Usecase + Sync + Send>,
    pub create: Arc<dyn create::Usecase + Sync + Send>,
    pub delete: Arc<dyn delete::Usecase + Sync + Send>,
    pub like: Arc<dyn like::Usecase + Sync + Send>,
    pub comment: Arc<dyn comment::Usecase + Sync + Send>,
}

#[derive(Deserialize, Default)]
pub struct TrackRefBody {
    title: Option<String>,
    artist: Option<String>,
    url: Option<String>,
    language: Option<String>,
}

impl From<TrackRefBody> for TrackRef {
    fn from(
        TrackRefBody {
            title,
            artist,
            url,
            language,
        }: TrackRefBody,
    ) -> Self {
        TrackRef {
            title,
            artist,
            url,
            language,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    #[serde(alias = "imageUrl")]
    image: Option<String>,
    tags: Option<Vec<String>>,
    music_track: Option<TrackRefBody>,
}

#[derive(Deserialize)]
pub struct CommentBody {
    #[serde(alias = "text")]
    comment: Option<String>,
}

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Vec<PostView>>> {
    state
        .blog
        .list
        .handle(list::Input {})
        .await?
        .let_(Vec::<PostView>::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PostView>> {
    let post_id = parse_id::<PostId>(&id, POST_NOT_FOUND)?;

    state
        .blog
        .get
        .handle(get::Input { post_id })
        .await?
        .let_(PostView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    payload: ::std::result::Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<PostView>> {
    let Json(body) = payload?;

    state
        .blog
        .create
        .handle(create::Input {
            title: body.title,
            content: body.content,
            excerpt: body.excerpt,
            image_url: body.image,
            tags: body.tags,
            music_track: body.music_track.map(Into::into),
            author: claims.sub,
        })
        .await?
        .let_(PostView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageView>> {
    let post_id = parse_id::<PostId>(&id, POST_NOT_FOUND)?;

    let out = state
        .blog
        .delete
        .handle(delete::Input {
            post_id,
            requester: claims.sub,
            role: claims.role,
        })
        .await?;
    tracing::info!(post_id = %out.post.id, "post deleted");

    Ok(Json(MessageView::new("Post deleted successfully")))
}

pub(crate) async fn like(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PostView>> {
    let post_id = parse_id::<PostId>(&id, POST_NOT_FOUND)?;

    state
        .blog
        .like
        .handle(like::Input {
            post_id,
            user_id: claims.sub,
        })
        .await?
        .let_(PostView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn comment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    payload: ::std::result::Result<Json<CommentBody>, JsonRejection>,
) -> Result<Json<PostView>> {
    let post_id = parse_id::<PostId>(&id, POST_NOT_FOUND)?;
    let Json(body) = payload?;

    state
        .blog
        .comment
        .handle(comment::Input {
            post_id,
            user_id: claims.sub,
            text: body.comment,
        })
        .await?
        .let_(PostView::from)
        .let_(Json)
        .let_(Ok)
}
