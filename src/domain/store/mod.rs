//! Generic key-value document store traits
//!
//! Persistence in this product is a plain document store: every entity is
//! serialized whole and addressed by a string key. Backends live in
//! `infrastructure::store`.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Trait for types usable as document keys
pub trait DocumentKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for backends that require string keys
    fn as_str(&self) -> &str;
}

impl DocumentKey for String {
    fn as_str(&self) -> &str {
        self
    }
}

/// Trait for entities persisted as whole documents
pub trait Document: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this document
    type Key: DocumentKey;

    /// Returns the document's key
    fn key(&self) -> &Self::Key;
}

/// Generic document store over any `Document` type
#[async_trait]
pub trait DocumentStore<E>: Send + Sync + Debug
where
    E: Document + 'static,
{
    /// Retrieves a document by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all documents
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Saves a document, replacing any existing one with the same key.
    /// Last write wins; there is no diffing or conflict resolution.
    async fn save(&self, entity: E) -> Result<E, DomainError>;

    /// Deletes a document by its key, returns true if one was removed
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks whether a document exists
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }
}
