//! Comment threads on documents
//!
//! Comments are append-only. A reply points at its parent by id, and the
//! parent must live on the same document. Listings expand each reply's
//! parent one level deep for display; the tree is never materialized.

mod store;
mod types;

pub use store::CommentStore;
pub use types::{sanitize_text, Comment, CommentView, MAX_COMMENT_CHARS};
