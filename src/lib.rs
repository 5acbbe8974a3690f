// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export specific items for convenience if needed
pub use error::SanitizeError;
pub use routes::create_router;
pub use utils::html::{
    HtmlCleaner, assert_escaped, escape_structure, format_as_tag, strip_tags, unescape_structure,
};
pub use utils::sanitizer::{EscapeMode, HtmlSanitizer, Sanitizer};
