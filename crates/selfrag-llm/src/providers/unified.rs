use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use selfrag_core::{ChatMessage, LLMConfig, LLMError, LLMProvider, LLMResponse, Role, TokenUsage};

/// Supported chat-completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    OpenAI,
    Anthropic,
    Ollama,
    Groq,
    Mistral,
}

impl BackendKind {
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::Mistral => Some("MISTRAL_API_KEY"),
            Self::Ollama => None,
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => Some("http://localhost:11434"),
            _ => None,
        }
    }

    fn to_llm_backend(&self) -> llm::builder::LLMBackend {
        match self {
            Self::OpenAI => llm::builder::LLMBackend::OpenAI,
            Self::Anthropic => llm::builder::LLMBackend::Anthropic,
            Self::Ollama => llm::builder::LLMBackend::Ollama,
            Self::Groq => llm::builder::LLMBackend::Groq,
            Self::Mistral => llm::builder::LLMBackend::Mistral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::Groq => "groq",
            Self::Mistral => "mistral",
        }
    }
}

impl FromStr for BackendKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "groq" => Ok(Self::Groq),
            "mistral" => Ok(Self::Mistral),
            _ => Err("unknown backend kind"),
        }
    }
}

/// Chat-completion provider over the `llm` crate backends.
#[derive(Debug)]
pub struct UnifiedProvider {
    backend: BackendKind,
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl UnifiedProvider {
    pub fn new(
        backend: BackendKind,
        model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, LLMError> {
        let api_key = match api_key {
            Some(key) => Some(key),
            None => match backend.api_key_env_var() {
                Some(env_var) => Some(std::env::var(env_var).map_err(|_| {
                    LLMError::Config(format!(
                        "API key not found in environment variable {}",
                        env_var
                    ))
                })?),
                None => None,
            },
        };

        let base_url = base_url.or_else(|| backend.default_base_url().map(String::from));

        Ok(Self {
            backend,
            model: model.into(),
            api_key,
            base_url,
        })
    }

    /// Resolves the API key from the backend's environment variable.
    pub fn from_env(backend: BackendKind, model: impl Into<String>) -> Result<Self, LLMError> {
        Self::new(backend, model, None, None)
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn convert_message(msg: &ChatMessage) -> llm::chat::ChatMessage {
        // System prompts are folded into the user turn; the llm crate builder
        // has no dedicated system role across all backends.
        match msg.role {
            Role::System | Role::User => {
                llm::chat::ChatMessage::user().content(&msg.content).build()
            }
            Role::Assistant => llm::chat::ChatMessage::assistant()
                .content(&msg.content)
                .build(),
        }
    }

    fn build_llm(&self, config: Option<&LLMConfig>) -> Result<Box<dyn llm::LLMProvider>, LLMError> {
        let mut builder = llm::builder::LLMBuilder::new()
            .backend(self.backend.to_llm_backend())
            .model(&self.model);

        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                builder = builder.api_key(key);
            }
        }

        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url);
        }

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                builder = builder.temperature(temp);
            }
            if let Some(max_tok) = cfg.max_tokens {
                builder = builder.max_tokens(max_tok);
            }
        }

        builder
            .build()
            .map_err(|e| LLMError::Config(format!("failed to build LLM backend: {}", e)))
    }
}

#[async_trait]
impl LLMProvider for UnifiedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: Option<&LLMConfig>,
    ) -> Result<LLMResponse, LLMError> {
        let llm_messages: Vec<llm::chat::ChatMessage> =
            messages.iter().map(Self::convert_message).collect();

        let llm = self.build_llm(config)?;

        debug!(backend = self.backend.as_str(), model = %self.model, "dispatching completion");

        let response = llm.chat(&llm_messages).await.map_err(|e| LLMError::API {
            message: format!("LLM provider error: {}", e),
            status: None,
        })?;

        let content = response.text().unwrap_or_default();

        let usage = response.usage().map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let mut out = LLMResponse::new(content).with_model(self.model.clone());
        out.usage = usage;
        Ok(out)
    }

    fn provider_name(&self) -> &str {
        self.backend.as_str()
    }
}
