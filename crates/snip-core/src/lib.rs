pub mod config;
pub mod error;
pub mod types;

pub use error::{SnipError, SnipResult};
pub use types::{SnippetMetadata, SnippetModel, SnippetSpec, SnippetType, SpecVersion};
