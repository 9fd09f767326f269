//! Persistence, state transfer and offline patching for a static memory page with
//! inline editing and photo uploads.
//!
//! - [`storage`] keeps edited text and uploaded photos across a small synchronous
//!   store and a larger asynchronous one.
//! - [`page`] models the keyed nodes of the page and the edit/upload actions.
//! - [`transfer`] collects the page into a [`PageState`], exports it and imports it.
//! - [`patch`] bakes a saved state into the static HTML file; [`cli`] is the
//!   `apply-state` tool around it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod page;
pub mod patch;
pub mod state;
pub mod storage;
pub mod transfer;

pub use config::PageConfig;
pub use page::{Document, PageDocument};
pub use patch::{PatchJob, Patcher};
pub use state::PageState;
