//! Theme engine and template helpers.
//!
//! Pages are rendered with Tera. A built-in template set is compiled into
//! the binary; a template directory on disk may override any of them.

mod engine;
pub mod helpers;

pub use engine::ThemeEngine;
