use assetsync_primitives::checksum::Checksum;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// A checksum set handed to the engine contained [`Checksum::NULL`].
    #[error("checksum set contains the null checksum")]
    NullChecksum,

    /// The asset source answered with a different number of assets than requested.
    #[error("asset source returned {received} assets for {requested} requested checksums")]
    ResponseLengthMismatch { requested: usize, received: usize },

    /// An asset was not resident right after a successful synchronization.
    #[error("asset `{0}` is absent from the cache after synchronization")]
    MissingAfterSync(Checksum),

    #[error("synchronization cancelled")]
    Cancelled,

    /// Fault raised by the asset source, passed through as-is.
    #[error(transparent)]
    Source(eyre::Report),
}

impl SyncError {
    /// Whether this error is a broken invariant between caller, cache and
    /// source rather than a transport fault or cancellation.
    ///
    /// Contract violations are never worth retrying.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::NullChecksum | Self::ResponseLengthMismatch { .. } | Self::MissingAfterSync(_)
        )
    }
}
