//! AI Response Validation
//!
//! Validation layer for raw model output. A response is only usable when it
//! honors the fenced output contract and the code inside parses as Python;
//! violations fail loudly rather than passing broken text through to disk.

mod fence;
mod syntax;

pub use fence::extract_generated_code;
pub use syntax::validate_python;
