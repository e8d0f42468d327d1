//! Botflow API
//!
//! Backend for a chatbot workflow builder: users draw conversation flow
//! graphs, attach FAQs and business context, and embed the resulting
//! assistant on their own sites as a widget. Chat turns are grounded in the
//! graph's decision flows and rate-limited per subscription tier.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::faq::Faq;
use domain::rate_limit::UsageCounters;
use domain::store::{Document, DocumentStore};
use domain::subscription::Subscription;
use domain::widget::WidgetDomain;
use domain::Workflow;
use infrastructure::auth::StaticTokenAuth;
use infrastructure::cache::{WorkflowCache, WorkflowCacheConfig};
use infrastructure::crawler::{CrawlerConfig, HttpContentFetcher};
use infrastructure::llm::{HttpClient, OpenAiProvider};
use infrastructure::rate_limit::UsageService;
use infrastructure::services::{
    ChatService, ChatSettings, FaqService, SubscriptionService, WidgetService, WorkflowService,
};
use infrastructure::store::{InMemoryStore, PostgresConfig, PostgresStore, StoreBackend};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend: StoreBackend = config
        .storage
        .backend
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    info!("Storage backend: {:?}", backend);

    let stores = match backend {
        StoreBackend::InMemory => Stores::in_memory(),
        StoreBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("storage.database_url is required for the postgres backend")
                })?;

            let mut pg_config = PostgresConfig::new(url);
            pg_config.max_connections = config.storage.max_connections;

            info!("Connecting to PostgreSQL...");
            let pool = pg_config.connect().await?;

            Stores::postgres(pool).await?
        }
    };

    let cache = WorkflowCache::new(WorkflowCacheConfig {
        max_capacity: config.cache.max_capacity,
        ttl: Duration::from_secs(config.cache.workflow_ttl_secs),
    });

    let workflow_service = Arc::new(WorkflowService::new(
        stores.workflows.clone(),
        stores.faqs.clone(),
        stores.widget_domains.clone(),
        cache,
    ));
    let faq_service = Arc::new(FaqService::new(
        stores.faqs.clone(),
        stores.workflows.clone(),
    ));
    let widget_service = Arc::new(WidgetService::new(
        stores.widget_domains,
        stores.workflows,
        config.widget.primary_domain.clone(),
    ));
    let subscription_service = Arc::new(SubscriptionService::new(stores.subscriptions));
    let usage_service = Arc::new(UsageService::new(stores.usage_counters));

    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let http_client =
        HttpClient::with_timeout(Duration::from_secs(config.llm.request_timeout_secs))?;
    let provider = match &config.llm.base_url {
        Some(base_url) => OpenAiProvider::with_base_url(http_client, api_key, base_url),
        None => OpenAiProvider::new(http_client, api_key),
    };

    let chat_service = Arc::new(ChatService::new(
        workflow_service.clone(),
        faq_service.clone(),
        widget_service.clone(),
        subscription_service.clone(),
        usage_service.clone(),
        Arc::new(provider),
        ChatSettings {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        },
    ));

    let content_fetcher = HttpContentFetcher::new(CrawlerConfig {
        request_timeout_secs: config.crawler.request_timeout_secs,
        ..CrawlerConfig::default()
    })?;

    let auth_service = StaticTokenAuth::from_entries(&config.auth.tokens)?;

    Ok(AppState {
        workflow_service,
        faq_service,
        widget_service,
        chat_service,
        subscription_service,
        usage_service,
        content_fetcher: Arc::new(content_fetcher),
        auth_service: Arc::new(auth_service),
        public_base_url: config.widget.public_base_url.clone(),
    })
}

struct Stores {
    workflows: Arc<dyn DocumentStore<Workflow>>,
    faqs: Arc<dyn DocumentStore<Faq>>,
    widget_domains: Arc<dyn DocumentStore<WidgetDomain>>,
    usage_counters: Arc<dyn DocumentStore<UsageCounters>>,
    subscriptions: Arc<dyn DocumentStore<Subscription>>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            workflows: Arc::new(InMemoryStore::new()),
            faqs: Arc::new(InMemoryStore::new()),
            widget_domains: Arc::new(InMemoryStore::new()),
            usage_counters: Arc::new(InMemoryStore::new()),
            subscriptions: Arc::new(InMemoryStore::new()),
        }
    }

    async fn postgres(pool: sqlx::PgPool) -> anyhow::Result<Self> {
        Ok(Self {
            workflows: connect_table::<Workflow>(&pool, "workflows").await?,
            faqs: connect_table::<Faq>(&pool, "faqs").await?,
            widget_domains: connect_table::<WidgetDomain>(&pool, "widget_domains").await?,
            usage_counters: connect_table::<UsageCounters>(&pool, "usage_counters").await?,
            subscriptions: connect_table::<Subscription>(&pool, "subscriptions").await?,
        })
    }
}

async fn connect_table<E>(
    pool: &sqlx::PgPool,
    table: &str,
) -> anyhow::Result<Arc<dyn DocumentStore<E>>>
where
    E: Document + 'static,
{
    let store = PostgresStore::<E>::new(pool.clone(), table);
    store.ensure_table().await?;
    Ok(Arc::new(store))
}
