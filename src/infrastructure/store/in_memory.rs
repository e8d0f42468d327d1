//! In-memory document store
//!
//! Default backend for development and tests; data is lost when the process
//! exits.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::store::{Document, DocumentKey, DocumentStore};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct InMemoryStore<E>
where
    E: Document,
{
    documents: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStore<E>
where
    E: Document,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStore<E>
where
    E: Document,
{
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with documents
    pub fn with_documents(documents: Vec<E>) -> Self {
        let store = Self::new();
        {
            let mut map = store.documents.write().unwrap();
            for doc in documents {
                map.insert(doc.key().as_str().to_string(), doc);
            }
        }
        store
    }
}

#[async_trait]
impl<E> DocumentStore<E> for InMemoryStore<E>
where
    E: Document + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let documents = self
            .documents
            .read()
            .map_err(|e| DomainError::storage(format!("Read lock poisoned: {}", e)))?;

        Ok(documents.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let documents = self
            .documents
            .read()
            .map_err(|e| DomainError::storage(format!("Read lock poisoned: {}", e)))?;

        Ok(documents.values().cloned().collect())
    }

    async fn save(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut documents = self
            .documents
            .write()
            .map_err(|e| DomainError::storage(format!("Write lock poisoned: {}", e)))?;

        documents.insert(key, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| DomainError::storage(format!("Write lock poisoned: {}", e)))?;

        Ok(documents.remove(key.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestDoc {
        id: String,
        value: i32,
    }

    impl Document for TestDoc {
        type Key = String;

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    fn doc(id: &str, value: i32) -> TestDoc {
        TestDoc {
            id: id.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store: InMemoryStore<TestDoc> = InMemoryStore::new();

        store.save(doc("1", 42)).await.unwrap();

        let found = store.get(&"1".to_string()).await.unwrap();
        assert_eq!(found, Some(doc("1", 42)));
    }

    #[tokio::test]
    async fn test_save_replaces_last_write_wins() {
        let store: InMemoryStore<TestDoc> = InMemoryStore::new();

        store.save(doc("1", 1)).await.unwrap();
        store.save(doc("1", 2)).await.unwrap();

        let found = store.get(&"1".to_string()).await.unwrap().unwrap();
        assert_eq!(found.value, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store: InMemoryStore<TestDoc> = InMemoryStore::new();

        store.save(doc("1", 1)).await.unwrap();
        assert!(store.delete(&"1".to_string()).await.unwrap());
        assert!(!store.delete(&"1".to_string()).await.unwrap());
        assert!(!store.exists(&"1".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_with_documents() {
        let store = InMemoryStore::with_documents(vec![doc("1", 1), doc("2", 2)]);
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
