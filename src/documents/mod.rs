//! Documents and share links
//!
//! The [`DocumentRegistry`] owns document records and the share-link
//! lifecycle. The [`ShareResolver`] turns an inbound share token back into a
//! document.
//!
//! A share token is `{document_id}-{8 hex digits}`. Resolution only looks at
//! the id prefix, so anyone holding a well-formed token can read the
//! document: the link is a capability, not an ACL entry.

mod registry;
mod share;
mod types;

pub use registry::{normalize_emails, DocumentRegistry};
pub use share::{mint_share_token, parse_share_token, ShareResolver};
pub use types::Document;
