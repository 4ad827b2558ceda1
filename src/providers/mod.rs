pub mod error;
pub mod factory;
pub mod http;
pub mod mock;
pub mod openai_compat;
pub mod simulated;
pub mod types;

pub use error::ProviderError;
pub use factory::create_provider;
pub use openai_compat::OpenAICompatProvider;
pub use simulated::SimulatedModel;
pub use types::ApiKey;
