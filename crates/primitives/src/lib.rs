//! Shared value types for the asset synchronization crates.
//!
//! - [`Checksum`](checksum::Checksum): the content hash identifying an asset
//! - [`AssetHint`](hint::AssetHint): an opaque tag forwarded to asset sources

pub mod checksum;
pub mod hint;
pub mod serde_duration;
