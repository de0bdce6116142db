use bson::{doc, Bson, Document};
use chrono::Utc;
use mongodb::error::Result as MongoResult;
use mongodb::{Collection, Database};
use tracing::Instrument;

use super::converters::{convert_404_or, convert_repo_err, to_bool};
use super::super::{RepositoryError, Result as RepoResult};
use crate::utils::LetChain;

pub async fn initialize_coll(
    coll_name: &str,
    db: &Database,
    mut indexes: Vec<Document>,
) -> MongoResult<()> {
    indexes.push(doc! {
        "name": "unique_id",
        "key": { "id": 1 },
        "unique": true
    });

    db.run_command(
        doc! {
            "createIndexes": coll_name,
            "indexes": indexes,
        },
        None,
    )
    .instrument(tracing::trace_span!("run_command"))
    .await?;

    Ok(())
}

pub async fn get_one<T>(coll: &Collection<T>, id: impl Into<Bson>) -> RepoResult<T>
where T: Sync + Send + Unpin + ::serde::de::DeserializeOwned {
    let res = coll
        .find_one(doc! { "id": id.into() }, None)
        .instrument(tracing::trace_span!("find_one"))
        .await
        .let_(convert_repo_err)?
        .let_(convert_404_or)?;

    Ok(res)
}

#[derive(Debug, Clone, Copy)]
pub enum ModifyOpTy {
    Push,
    Pull,
}

pub async fn is_exists<T>(coll: &Collection<T>, id: impl Into<Bson>) -> RepoResult<bool> {
    let res = coll
        .count_documents(doc! { "id": id.into() }, None)
        .instrument(tracing::trace_span!("count_documents"))
        .await
        .let_(convert_repo_err)?
        .let_(to_bool);

    Ok(res)
}

/// Conditional single-document `$addToSet` / `$pull`. The membership test
/// lives in the filter, so the server decides and applies it in one atomic
/// step and concurrent writers can never store a duplicate.
pub async fn modify_set<T>(
    name: &str,
    coll: &Collection<T>,
    id: impl Into<Bson>,
    target: impl Into<Bson>,
    ty: ModifyOpTy,
) -> RepoResult<bool> {
    let id = id.into();
    let target = target.into();

    let (condition, operation) = match ty {
        ModifyOpTy::Push => (doc! { "$ne": target.clone() }, "$addToSet"),
        ModifyOpTy::Pull => (doc! { "$eq": target.clone() }, "$pull"),
    };

    let res = coll
        .update_one(
            doc! { "id": id.clone(), name: condition },
            doc! {
                operation: { name: target },
                "$set": { "updated_at": bson::DateTime::from_chrono(Utc::now()) }
            },
            None,
        )
        .instrument(tracing::trace_span!("update_one", operation))
        .await
        .let_(convert_repo_err)?;

    if res.matched_count.let_(to_bool) {
        return Ok(true);
    }

    // untouched: either the document is gone or membership was already as asked
    match is_exists(coll, id).await? {
        true => Ok(false),
        false => Err(RepositoryError::NotFound),
    }
}

pub async fn push_one<T>(
    name: &str,
    coll: &Collection<T>,
    id: impl Into<Bson>,
    item: Bson,
) -> RepoResult<()> {
    let res = coll
        .update_one(
            doc! { "id": id.into() },
            doc! {
                "$push": { name: item },
                "$set": { "updated_at": bson::DateTime::from_chrono(Utc::now()) }
            },
            None,
        )
        .instrument(tracing::trace_span!("update_one", operation = "$push"))
        .await
        .let_(convert_repo_err)?;

    if !res.matched_count.let_(to_bool) {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
