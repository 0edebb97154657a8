//! LLM provider integrations for buzzdeck.
//!
//! Each provider implements both [`QuestionGenerator`] and
//! [`SimilarityJudge`] from `buzzdeck-core`; [`config`] loads user
//! settings and builds a [`ProviderHandle`] exposing the two roles.
//!
//! [`QuestionGenerator`]: buzzdeck_core::traits::QuestionGenerator
//! [`SimilarityJudge`]: buzzdeck_core::traits::SimilarityJudge

pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;

pub use config::{
    create_default_provider, create_provider, load_config, load_config_from, BuzzdeckConfig,
    ProviderConfig, ProviderHandle,
};
pub use error::ProviderError;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
