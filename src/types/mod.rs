pub mod error;
pub mod generation;
pub mod model;

pub use error::{BackendError, DocError, ErrorCategory, Result};
pub use generation::{DocstringFormat, GenerationConfig};
pub use model::ModelId;
