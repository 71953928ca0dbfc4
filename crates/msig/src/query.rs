//! The state of a remote read.

use crate::error::MultisigError;
use serde::Serialize;
use std::future::Future;

/// A remote read: loading until it resolves, then either ready or failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Query<T> {
    Loading,
    Ready(T),
    Failed(MultisigError),
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Query<T> {
    /// Awaits the read and records its outcome.
    pub async fn fetch<F>(read: F) -> Self
    where
        F: Future<Output = Result<T, MultisigError>>,
    {
        read.await.into()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The value, if the read succeeded.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The error, if the read failed.
    pub fn error(&self) -> Option<&MultisigError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Query<U> {
        match self {
            Self::Loading => Query::Loading,
            Self::Ready(value) => Query::Ready(f(value)),
            Self::Failed(err) => Query::Failed(err),
        }
    }
}

impl<T> From<Result<T, MultisigError>> for Query<T> {
    fn from(res: Result<T, MultisigError>) -> Self {
        match res {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err),
        }
    }
}
