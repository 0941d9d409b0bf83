//! PDF Share Server Library
//!
//! Upload PDFs, hand out share links, and collect threaded comments from
//! whoever holds a link. The binary in main.rs wires these modules to
//! configuration and serves [`routes::app`].
//!
//! # Modules
//!
//! - `documents`: document registry and share-link resolution
//! - `comments`: append-only comment threads
//! - `auth`: bearer verification and comment attribution
//! - `storage`, `notify`: object store and mail collaborators

pub mod auth;
pub mod comments;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod ids;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;
