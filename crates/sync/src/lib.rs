//! Content-addressed asset synchronization.
//!
//! Callers ask a [`SyncEngine`] for assets by [`Checksum`]; the engine serves
//! cache hits directly and fetches the missing remainder from an
//! [`AssetSource`] in one batched request per synchronization, merging the
//! results back into the cache.
//!
//! # Example
//!
//! ```rust,ignore
//! let pool = Arc::new(ChecksumPool::from_config(&config));
//! let engine = SyncEngine::new(root, cache, source, context, pool);
//!
//! let asset = engine.get(checksum, &cancel).await?;
//! let assets = engine.get_bulk(AssetHint::FULL, &checksums, &cancel).await?;
//! ```
//!
//! [`Checksum`]: assetsync_primitives::checksum::Checksum

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod expander;
pub mod pool;
pub mod source;

pub use config::SyncConfig;
pub use diagnostics::{SlowSyncScope, SyncDiagnostics, TracingDiagnostics};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use expander::{AssetTree, Expander};
pub use pool::{ChecksumPool, PoolStats, ScratchBuffer};
pub use source::AssetSource;
