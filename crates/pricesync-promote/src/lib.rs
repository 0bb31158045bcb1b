//! # pricesync-promote -- Branch-to-branch price-list promotion
//!
//! Copies the current price-list artifact and its latest-filename pointer
//! from a staging branch to a production branch.
//!
//! ## Stores
//!
//! The procedure runs against two [`ContentStore`] values, one per branch.
//! [`pricesync_repo::RepoClient`] implements the trait against the host;
//! [`memory::MemoryStore`] implements it in process.
//!
//! ```ignore
//! let source = RepoClient::new(config.clone())?;
//! let target = RepoClient::new(config.with_branch("master"))?;
//! let report = promote(&source, &target, &PromotionOptions::default()).await?;
//! ```

pub mod error;
pub mod memory;
pub mod pointer;
pub mod promotion;
pub mod store;

pub use error::{PromotionError, Stage};
pub use pointer::{decode_pointer, encode_pointer, PointerError};
pub use promotion::{
    promote, resolve_pointer, PromotionOptions, PromotionReport, PurgeOutcome,
};
pub use store::ContentStore;
