//! LLM providers for the selfrag retrieval loop

pub mod mock;
pub mod providers;

pub use mock::MockProvider;
pub use providers::{BackendKind, UnifiedProvider};
