//! # Scripture Source
//!
//! Everything that touches the outside world for text: the bolls.life HTTP
//! client and the on-disk translation cache. The core never calls into this
//! module directly; the TUI runs these operations in background tasks and
//! feeds the results back as actions.

pub mod cache;
pub mod client;
pub mod source;
pub mod types;

pub use cache::{CacheError, TranslationCache};
pub use client::BollsClient;
pub use source::{ScriptureSource, SourceError};
pub use types::{Book, Division, ParallelChapter, Translation, Verse};
