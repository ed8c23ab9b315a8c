mod unified;

pub use unified::{BackendKind, UnifiedProvider};
