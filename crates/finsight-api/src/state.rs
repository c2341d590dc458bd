use std::sync::Arc;

use finsight_agent::{Advisor, AdvisorBuilder};
use finsight_auth::{AuthService, Mailer};
use finsight_llm::ChatClient;
use finsight_memory::{ConversationMemory, KeywordIndex};
use finsight_persist::Stores;

use crate::config::Config;
use crate::rooms::RoomHub;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisor: Arc<Advisor>,
    pub auth: Arc<AuthService>,
    pub stores: Stores,
    pub rooms: Arc<RoomHub>,
    /// Storage backend name reported by the service info endpoints
    pub persistence: &'static str,
}

impl AppState {
    /// Wire the advisor and auth service over `stores`.
    ///
    /// Without a chat client the advisor answers with the "not configured"
    /// apology and report generation is unavailable.
    pub fn new(
        config: Config,
        llm_client: Option<Arc<dyn ChatClient>>,
        stores: Stores,
        mailer: Arc<dyn Mailer>,
        persistence: &'static str,
    ) -> Self {
        let mut memory = ConversationMemory::new();
        if config.memory.search_enabled {
            memory = memory.with_index(Arc::new(KeywordIndex::new()));
        }

        let advisor = AdvisorBuilder::new()
            .maybe_llm_client(llm_client)
            .settings(config.llm.clone().into())
            .memory(Arc::new(memory))
            .stores(stores.clone())
            .public_url(config.server.public_url.clone())
            .build();

        let auth = AuthService::new(
            stores.clients.clone(),
            stores.auth_tokens.clone(),
            stores.sessions.clone(),
            mailer,
        )
        .with_settings(config.auth.clone().into());

        Self {
            config: Arc::new(config),
            advisor: Arc::new(advisor),
            auth: Arc::new(auth),
            stores,
            rooms: Arc::new(RoomHub::new()),
            persistence,
        }
    }
}
