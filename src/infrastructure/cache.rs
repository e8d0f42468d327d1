//! Workflow cache backed by moka
//!
//! Widget chat traffic reads the same workflow on every message, so loaded
//! workflows are kept in a TTL cache and evicted whenever the workflow is
//! saved or deleted.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Workflow, WorkflowId};

#[derive(Debug, Clone)]
pub struct WorkflowCacheConfig {
    pub max_capacity: u64,
    pub ttl: Duration,
}

impl Default for WorkflowCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowCache {
    cache: MokaCache<String, Arc<Workflow>>,
}

impl WorkflowCache {
    pub fn new(config: WorkflowCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, id: &WorkflowId) -> Option<Arc<Workflow>> {
        self.cache.get(id.as_str()).await
    }

    pub async fn put(&self, workflow: Workflow) -> Arc<Workflow> {
        let workflow = Arc::new(workflow);
        self.cache
            .insert(workflow.id().as_str().to_string(), workflow.clone())
            .await;
        workflow
    }

    pub async fn invalidate(&self, id: &WorkflowId) {
        self.cache.invalidate(id.as_str()).await;
    }
}

impl Default for WorkflowCache {
    fn default() -> Self {
        Self::new(WorkflowCacheConfig::default())
    }
}
