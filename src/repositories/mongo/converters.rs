use anyhow::anyhow;
use mongodb::error::{ErrorKind, Result as MongoResult, WriteFailure};

use super::super::{RepositoryError, Result as RepoResult};

const DUPLICATE_KEY: i32 = 11000;

pub fn convert_repo_err<T, E>(result: Result<T, E>) -> RepoResult<T>
where E: Sync + Send + ::std::error::Error + 'static {
    result.map_err(|e| RepositoryError::Internal(anyhow!(e)))
}

pub fn convert_model<M, T>(model: M) -> RepoResult<T>
where T: TryFrom<M, Error = ::anyhow::Error> {
    T::try_from(model).map_err(RepositoryError::Internal)
}

/// `Ok(false)` when the write hit a unique index.
pub fn try_unique_check<T>(result: MongoResult<T>) -> RepoResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) => match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY =>
                Ok(false),
            _ => Err(RepositoryError::Internal(anyhow!(e))),
        },
    }
}

pub fn convert_404_or<T>(option: Option<T>) -> RepoResult<T> {
    match option {
        Some(t) => Ok(t),
        None => Err(RepositoryError::NotFound),
    }
}

pub fn to_bool(number: u64) -> bool {
    match number {
        0 => false,
        1 => true,
        n => unreachable!("expected 0 or 1, found: {}", n),
    }
}
