use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::{parse_id, AppState, AuthUser};
use crate::entities::{MusicId, UserId};
use crate::error::Result;
use crate::presenters::music::{self as view, MusicView};
use crate::usecases::music::{add, like, list, play, trending};
use crate::utils::LetChain;

const MUSIC_NOT_FOUND: &str = "Music not found";

pub struct MusicController {
    pub list: Arc<dyn list::Usecase + Sync + Send>,
    pub trending: Arc<dyn trending::Usecase + Sync + Send>,
    pub add: Arc<dyn add::Usecase + Sync + Send>,
    pub like: Arc<dyn like::Usecase + Sync + Send>,
    pub play: Arc<dyn play::Usecase + Sync + Send>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    language: Option<String>,
    search: Option<String>,
    sort: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
    title: Option<String>,
    artist: Option<String>,
    language: Option<String>,
    #[serde(alias = "imageUrl")]
    image: Option<String>,
    audio_url: Option<String>,
}

pub(crate) async fn list(
    State(state): State<AppState>,
    query: ::std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<MusicView>>> {
    let Query(query) = query?;

    state
        .music
        .list
        .handle(list::Input {
            language: query.language,
            search: query.search,
            sort: query.sort,
        })
        .await?
        .let_(Vec::<MusicView>::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn by_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<Json<Vec<MusicView>>> {
    state
        .music
        .list
        .handle(list::Input {
            language: Some(language),
            search: None,
            sort: None,
        })
        .await?
        .let_(Vec::<MusicView>::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn trending(State(state): State<AppState>) -> Result<Json<Vec<MusicView>>> {
    state
        .music
        .trending
        .handle(trending::Input {})
        .await?
        .let_(Vec::<MusicView>::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn add(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    payload: ::std::result::Result<Json<AddBody>, JsonRejection>,
) -> Result<Json<MusicView>> {
    let Json(body) = payload?;

    state
        .music
        .add
        .handle(add::Input {
            title: body.title,
            artist: body.artist,
            language: body.language,
            image_url: body.image,
            audio_url: body.audio_url,
            added_by: claims.sub,
        })
        .await?
        .let_(MusicView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn like(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserId>>> {
    let music_id = parse_id::<MusicId>(&id, MUSIC_NOT_FOUND)?;

    let out = state
        .music
        .like
        .handle(like::Input {
            music_id,
            user_id: claims.sub,
        })
        .await?;

    Ok(Json(view::likes(&out)))
}

pub(crate) async fn play(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<u64>> {
    let music_id = parse_id::<MusicId>(&id, MUSIC_NOT_FOUND)?;

    state
        .music
        .play
        .handle(play::Input { music_id })
        .await?
        .let_(|out| Ok(Json(out.plays)))
}
