use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use super::{AppState, AuthUser};
use crate::entities::Password;
use crate::error::Result;
use crate::presenters::user::{AuthView, UserView};
use crate::usecases::user::{login, me, register};
use crate::utils::LetChain;

pub struct UserController {
    pub register: Arc<dyn register::Usecase + Sync + Send>,
    pub login: Arc<dyn login::Usecase + Sync + Send>,
    pub me: Arc<dyn me::Usecase + Sync + Send>,
}

#[derive(Deserialize, Validate)]
pub struct RegisterBody {
    username: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    payload: ::std::result::Result<Json<RegisterBody>, JsonRejection>,
) -> Result<Json<AuthView>> {
    let Json(body) = payload?;
    body.validate()?;

    state
        .user
        .register
        .handle(register::Input {
            username: body.username,
            email: body.email,
            password: body.password.map(Password),
        })
        .await?
        .let_(AuthView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn login(
    State(state): State<AppState>,
    payload: ::std::result::Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<AuthView>> {
    let Json(body) = payload?;

    state
        .user
        .login
        .handle(login::Input {
            email: body.email,
            password: body.password.map(Password),
        })
        .await?
        .let_(AuthView::from)
        .let_(Json)
        .let_(Ok)
}

pub(crate) async fn me(State(state): State<AppState>, AuthUser(claims): AuthUser) -> Result<Json<UserView>> {
    state
        .user
        .me
        .handle(me::Input {
            user_id: claims.sub,
        })
        .await?
        .let_(UserView::from)
        .let_(Json)
        .let_(Ok)
}
