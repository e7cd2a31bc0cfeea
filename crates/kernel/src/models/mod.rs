//! Catalog data models.
//!
//! Every model here is read-only from the application's point of view:
//! rows are created and edited out of band, the kernel only queries them.

pub mod category;
pub mod developer;
pub mod entry;
pub mod feature;
pub mod snippet;
pub mod stats;

pub use category::{Category, CategoryCount};
pub use developer::Developer;
pub use entry::Entry;
pub use feature::Feature;
pub use snippet::{Snippet, SnippetSet};
pub use stats::CatalogStats;
