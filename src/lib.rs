//! `riddlen-search` - Instant client-side search for the Riddlen documentation site.
//!
//! The document list is loaded once and every keystroke runs a linear,
//! case-insensitive substring filter over it. Query, highlight and excerpt
//! logic is independent of any UI; [`dropdown`] turns page events into
//! effects and [`render`] adapters produce HTML or terminal output.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

pub mod builder;
pub mod crawler;
pub mod dropdown;
pub mod error;
pub mod index;
pub mod ratelimit;
pub mod render;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use index::{Outcome, ResultSet, Scope, SearchIndex};
pub use types::Document;
