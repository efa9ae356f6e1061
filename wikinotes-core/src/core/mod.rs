//! Internal domain modules for the Wikinotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod autosave;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod delete;
pub mod edit;
pub mod error;
pub mod export;
pub mod history;
pub mod ids;
pub mod node;
pub mod session;
pub mod storage;
pub mod store;
pub mod tree;
pub mod zoom;
