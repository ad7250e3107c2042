//! Mock backend: canned replies behind simulated latency.

use async_trait::async_trait;
use henry_common::util::truncate_with_ellipsis;
use henry_common::AssistantConfig;

use crate::content::{self, GeneratedContent, GenerationParams};
use crate::{
    Assistant, AssistantError, AssistantReply, ChatContext, ConnectionStatus, ContentResponder,
};

const FEATURES: &[&str] = &[
    "Conversación natural",
    "Generación de contenido educativo",
    "Análisis de texto",
    "Respuestas contextuales",
];

/// Stand-in for a hosted model. Always reachable.
#[derive(Debug, Clone)]
pub struct MockAssistant {
    responder: ContentResponder,
    config: AssistantConfig,
}

impl MockAssistant {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            responder: ContentResponder::new(config.model.clone()),
            config,
        }
    }

    pub fn responder(&self) -> &ContentResponder {
        &self.responder
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    fn name(&self) -> &str {
        &self.config.service_name
    }

    fn model(&self) -> &str {
        self.responder.model()
    }

    async fn respond(
        &self,
        message: &str,
        role: &str,
        context: &ChatContext,
    ) -> Result<AssistantReply, AssistantError> {
        self.config.chat_latency.simulate().await;
        let reply = self.responder.respond(message, role, context);
        tracing::debug!(
            role = %role,
            message = %truncate_with_ellipsis(message, 60),
            prompt_tokens = reply.usage.prompt_tokens,
            completion_tokens = reply.usage.completion_tokens,
            "Assistant replied"
        );
        Ok(reply)
    }

    async fn generate_content(
        &self,
        kind: &str,
        topic: &str,
        params: &GenerationParams,
    ) -> Result<GeneratedContent, AssistantError> {
        self.config.generation_latency.simulate().await;
        let generated = content::generate(kind, topic, params);
        tracing::info!(kind = %kind, topic = %topic, "Content generated");
        Ok(generated)
    }

    async fn check_connection(&self) -> Result<ConnectionStatus, AssistantError> {
        self.config.status_latency.simulate().await;
        Ok(ConnectionStatus {
            connected: true,
            service: self.config.service_name.clone(),
            version: self.config.service_version.clone(),
            features: FEATURES.iter().map(|f| (*f).to_string()).collect(),
        })
    }
}
