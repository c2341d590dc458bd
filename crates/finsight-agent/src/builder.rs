use std::sync::Arc;

use finsight_llm::{ChatClient, ModelSettings};
use finsight_memory::ConversationMemory;
use finsight_persist::Stores;

use crate::advisor::Advisor;
use crate::router::{KeywordRouter, Router};

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";

/// Builder for an [`Advisor`]; every component is optional
pub struct AdvisorBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    settings: ModelSettings,
    memory: Option<Arc<ConversationMemory>>,
    stores: Option<Stores>,
    router: Option<Arc<dyn Router>>,
    public_url: String,
}

impl AdvisorBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            settings: ModelSettings::default(),
            memory: None,
            stores: None,
            router: None,
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }

    /// Set the language model. Without one, chat replies with an apology
    /// and report generation fails.
    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn maybe_llm_client(mut self, client: Option<Arc<dyn ChatClient>>) -> Self {
        self.llm_client = client;
        self
    }

    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn memory(mut self, memory: Arc<ConversationMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Base URL used in report links
    pub fn public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into();
        self
    }

    pub fn build(self) -> Advisor {
        Advisor {
            llm: self.llm_client,
            settings: self.settings,
            memory: self
                .memory
                .unwrap_or_else(|| Arc::new(ConversationMemory::new())),
            stores: self.stores.unwrap_or_else(Stores::in_memory),
            router: self
                .router
                .unwrap_or_else(|| Arc::new(KeywordRouter::default())),
            public_url: self.public_url,
        }
    }
}

impl Default for AdvisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
