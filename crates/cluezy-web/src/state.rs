//! Shared handler state

use std::sync::Arc;

use cluezy_config::AppConfig;
use cluezy_core::traits::{HeaderIdentity, IdentityProvider, LlmProvider, ToolExecutor};
use cluezy_core::{
    AgentBuilder, AgentRunner, ChatMutationGateway, ChatStore, Clock, InMemoryChatStore,
    PromptEnhancer, SystemClock, TurnInvoker,
};
use cluezy_llm::OpenAiProvider;
use cluezy_tools::ToolRegistry;
use tracing::{info, warn};

use crate::{Result, WebError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ChatStore>,
    pub gateway: Arc<ChatMutationGateway>,
    pub invoker: Arc<dyn TurnInvoker>,
    pub enhancer: Arc<PromptEnhancer>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wire the agent and handlers over explicit collaborators
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmProvider>,
        tools: Arc<dyn ToolExecutor>,
        store: Arc<dyn ChatStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let builder = AgentBuilder::new(tools.clone(), clock.clone());
        let runner = AgentRunner::new(builder, llm.clone(), tools).with_related_questions();
        let enhancer = PromptEnhancer::new(llm, clock, config.chat.enhance_model.clone());
        let gateway = ChatMutationGateway::new(store.clone(), config.features.save_chat_history);

        Self {
            config: Arc::new(config),
            store,
            gateway: Arc::new(gateway),
            invoker: Arc::new(runner),
            enhancer: Arc::new(enhancer),
            identity: Arc::new(HeaderIdentity),
        }
    }

    /// Production wiring: OpenAI-compatible provider, the full tool
    /// registry and an in-memory store
    pub fn from_config(config: AppConfig) -> Result<Self> {
        if !config.chat.has_api_key() {
            warn!("OPENAI_API_KEY is not set; model calls will be unauthenticated");
        }
        if !config.tools.has_search_key() {
            warn!("TAVILY_API_KEY is not set; web search will report errors");
        }

        let llm = OpenAiProvider::new(&config.chat).map_err(|e| WebError::Config(e.to_string()))?;
        let tools =
            ToolRegistry::new(config.tools.clone()).map_err(|e| WebError::Config(e.to_string()))?;
        info!(
            model = %config.chat.model,
            save_chat_history = config.features.save_chat_history,
            "Application state ready"
        );

        Ok(Self::new(
            config,
            Arc::new(llm),
            Arc::new(tools),
            Arc::new(InMemoryChatStore::new()),
            Arc::new(SystemClock),
        ))
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    pub fn saving_enabled(&self) -> bool {
        self.gateway.is_enabled()
    }
}
