use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::auth::{PasswordService, TokenService};
use crate::entities::{Role, User};
use crate::error::{AppError, Result};
use crate::repositories::{RepositoryError, UserRepository};
use crate::usecases::user::{login, me, register};
use crate::utils::{non_blank, LetChain};

pub struct UserRegisterInteractor {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub passwords: PasswordService,
    pub tokens: TokenService,
}
#[async_trait]
impl register::Usecase for UserRegisterInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: register::Input) -> Result<register::Output> {
        tracing::trace!("input - {:?}", data);

        let register::Input {
            username,
            email,
            password,
        } = data;

        let (username, email, password) = match (
            non_blank(username),
            non_blank(email).map(|e| e.to_lowercase()),
            password.filter(|p| !p.0.is_empty()),
        ) {
            (Some(u), Some(e), Some(p)) => (u, e, p),
            _ =>
                return Err(AppError::Validation(
                    "Please provide username, email and password".to_string(),
                )),
        };

        let passwords = self.passwords.clone();
        let password_hash = blocking(move || passwords.hash(&password.0)).await?;

        let new_user = User {
            id: ::uuid::Uuid::new_v4().into(),
            username,
            email,
            password_hash,
            role: Role::Member,
            created_at: Utc::now(),
        };

        let can_insert = self
            .user_repository
            .insert(new_user.clone())
            .await
            .map_err(user_err_fmt)?;

        if !can_insert {
            return Err(AppError::DuplicateKey("User already exists".to_string()));
        }

        let token = self
            .tokens
            .issue(&new_user)
            .map_err(|e| AppError::Internal(anyhow!(e)))?;

        tracing::info!(user_id = %new_user.id, "registered");

        register::Output {
            user: new_user,
            token,
        }
        .let_(Ok)
    }
}

pub struct UserLoginInteractor {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub passwords: PasswordService,
    pub tokens: TokenService,
}
#[async_trait]
impl login::Usecase for UserLoginInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: login::Input) -> Result<login::Output> {
        tracing::trace!("input - {:?}", data);

        let login::Input { email, password } = data;

        let (email, password) = match (non_blank(email), password) {
            (Some(e), Some(p)) => (e.to_lowercase(), p),
            _ => return Err(AppError::InvalidCredentials),
        };

        let user = match self.user_repository.find_by_email(&email).await {
            Ok(u) => u,
            Err(RepositoryError::NotFound) => return Err(AppError::InvalidCredentials),
            Err(e) => return Err(user_err_fmt(e)),
        };

        let passwords = self.passwords.clone();
        let hash = user.password_hash.clone();
        let matched = blocking(move || passwords.verify(&password.0, &hash)).await?;

        if !matched {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| AppError::Internal(anyhow!(e)))?;

        login::Output { user, token }.let_(Ok)
    }
}

pub struct UserMeInteractor {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl me::Usecase for UserMeInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: me::Input) -> Result<me::Output> {
        tracing::trace!("input - {:?}", data);

        self.user_repository
            .find(data.user_id)
            .await
            .map_err(user_err_fmt)?
            .let_(|user| me::Output { user })
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::*;
    use crate::entities::Password;

    fn register_with(f: &Fixture) -> UserRegisterInteractor {
        UserRegisterInteractor {
            user_repository: f.users.clone(),
            passwords: f.passwords.clone(),
            tokens: f.tokens.clone(),
        }
    }

    fn input(username: &str, email: &str, password: &str) -> register::Input {
        register::Input {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(Password(password.to_string())),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_and_issues_token() {
        let f = Fixture::new();

        let out = register::Usecase::handle(
            &register_with(&f),
            input("asha", "Asha@Example.com", "secret1"),
        )
        .await
        .unwrap();

        assert_eq!(out.user.email, "asha@example.com");
        assert_eq!(out.user.role, Role::Member);
        assert_ne!(out.user.password_hash, "secret1");
        assert_eq!(f.tokens.verify(&out.token).unwrap().sub, out.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_creates_nothing() {
        let f = Fixture::new();
        let interactor = register_with(&f);

        register::Usecase::handle(&interactor, input("asha", "asha@example.com", "secret1"))
            .await
            .unwrap();
        let err =
            register::Usecase::handle(&interactor, input("other", "asha@example.com", "secret2"))
                .await
                .unwrap_err();

        assert!(matches!(err, AppError::DuplicateKey(_)));
        let stored = f.users.find_by_email("asha@example.com").await.unwrap();
        assert_eq!(stored.username, "asha");
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let f = Fixture::new();
        let interactor = register_with(&f);

        for bad in [
            input("", "a@example.com", "secret1"),
            input("asha", "  ", "secret1"),
            input("asha", "a@example.com", ""),
        ] {
            assert!(matches!(
                register::Usecase::handle(&interactor, bad).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn login_checks_password() {
        let f = Fixture::new();
        register::Usecase::handle(&register_with(&f), input("asha", "asha@example.com", "secret1"))
            .await
            .unwrap();
        let interactor = UserLoginInteractor {
            user_repository: f.users.clone(),
            passwords: f.passwords.clone(),
            tokens: f.tokens.clone(),
        };

        let ok = login::Usecase::handle(&interactor, login::Input {
            email: Some("asha@example.com".to_string()),
            password: Some(Password("secret1".to_string())),
        })
        .await
        .unwrap();
        assert_eq!(ok.user.username, "asha");

        for (email, password) in [("asha@example.com", "wrong-one"), ("nobody@example.com", "secret1")] {
            let err = login::Usecase::handle(&interactor, login::Input {
                email: Some(email.to_string()),
                password: Some(Password(password.to_string())),
            })
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }
}
