//! Client-side session state backed by a token file.
//!
//! A client keeps exactly one `SessionContext`. It is filled from the
//! persisted token on start and changed in place by `login` / `logout`.
//! Claims are read without the signing secret, the way a browser decodes a
//! token it was handed; only the server's verification is authoritative.
//! The accessors treat a token whose `exp` has passed as logged out.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::Claims;
use crate::entities::{Role, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug)]
struct Current {
    token: String,
    user: SessionUser,
    exp: i64,
}

#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    current: Option<Current>,
}

fn read_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

impl SessionContext {
    /// Restores the session persisted at `path`. A missing file is an
    /// anonymous session; an unreadable or expired token is discarded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let raw = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    current: None,
                })
            },
            Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
        };

        let token = raw.trim().to_string();
        let current = match read_claims(&token) {
            Some(claims) => Some(Current {
                token,
                user: SessionUser {
                    user_id: claims.sub,
                    role: claims.role,
                },
                exp: claims.exp,
            }),
            None => {
                tracing::debug!(path = %path.display(), "discarding stale session token");
                remove(&path)?;
                None
            },
        };

        Ok(Self { path, current })
    }

    /// Persists `token` and switches the session to its user.
    pub fn login(&mut self, token: impl Into<String>) -> Result<SessionUser> {
        let token = token.into();
        let claims = read_claims(&token).context("token is malformed or expired")?;

        std::fs::write(&self.path, &token)
            .with_context(|| format!("cannot write {}", self.path.display()))?;

        let user = SessionUser {
            user_id: claims.sub,
            role: claims.role,
        };
        self.current = Some(Current {
            token,
            user,
            exp: claims.exp,
        });

        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.current = None;
        remove(&self.path)
    }

    fn live(&self) -> Option<&Current> {
        self.current
            .as_ref()
            .filter(|c| c.exp > Utc::now().timestamp())
    }

    pub fn is_authenticated(&self) -> bool { self.live().is_some() }

    pub fn user(&self) -> Option<SessionUser> { self.live().map(|c| c.user) }

    pub fn token(&self) -> Option<&str> { self.live().map(|c| c.token.as_str()) }
}

fn remove(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound =>
            Err(e).with_context(|| format!("cannot remove {}", path.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::auth::TokenService;
    use crate::entities::User;

    fn token(role: Role, ttl: Duration) -> (UserId, String) {
        let user = User {
            id: Uuid::new_v4().into(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        let token = TokenService::new(b"server-secret", ttl).issue(&user).unwrap();

        (user.id, token)
    }

    #[test]
    fn login_persists_and_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let (id, t) = token(Role::Admin, Duration::hours(1));

        let mut session = SessionContext::load(&path).unwrap();
        assert!(!session.is_authenticated());

        let user = session.login(t.clone()).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(session.token(), Some(t.as_str()));

        let reloaded = SessionContext::load(&path).unwrap();
        assert_eq!(reloaded.user(), Some(SessionUser {
            user_id: id,
            role: Role::Admin
        }));
    }

    #[test]
    fn logout_clears_state_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let (_, t) = token(Role::Member, Duration::hours(1));

        let mut session = SessionContext::load(&path).unwrap();
        session.login(t).unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(!path.exists());
        session.logout().unwrap();
    }

    #[test]
    fn stale_tokens_are_discarded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let expired = dir.path().join("expired");
        let garbage = dir.path().join("garbage");
        std::fs::write(&expired, token(Role::Member, Duration::hours(-1)).1).unwrap();
        std::fs::write(&garbage, "not a token").unwrap();

        for path in [expired, garbage] {
            let session = SessionContext::load(&path).unwrap();
            assert!(!session.is_authenticated());
            assert!(!path.exists());
        }
    }

    #[test]
    fn login_rejects_expired_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let mut session = SessionContext::load(&path).unwrap();

        assert!(session.login(token(Role::Member, Duration::hours(-1)).1).is_err());
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn session_lapses_once_the_token_expires() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let mut session = SessionContext::load(&path).unwrap();
        session.login(token(Role::Member, Duration::hours(1)).1).unwrap();
        assert!(session.is_authenticated());

        if let Some(current) = session.current.as_mut() {
            current.exp = Utc::now().timestamp() - 1;
        }

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.token().is_none());
    }
}
