use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;
use assetsync_primitives::hint::AssetHint;
use async_trait::async_trait;

/// Remote endpoint that materializes assets by checksum.
///
/// Implementations must answer with exactly one asset per requested checksum,
/// in request order. Transport faults are returned as-is and reach the
/// engine's caller untouched.
#[async_trait]
pub trait AssetSource<A>: Send + Sync {
    /// Opaque value forwarded with every request, typically whatever the
    /// source needs to decode payloads. The engine never inspects it.
    type Context: Send + Sync;

    async fn fetch(
        &self,
        root: Checksum,
        hint: AssetHint,
        checksums: &[Checksum],
        context: &Self::Context,
    ) -> eyre::Result<Vec<A>>;
}

#[async_trait]
impl<A, S> AssetSource<A> for Arc<S>
where
    S: AssetSource<A> + ?Sized,
{
    type Context = S::Context;

    async fn fetch(
        &self,
        root: Checksum,
        hint: AssetHint,
        checksums: &[Checksum],
        context: &Self::Context,
    ) -> eyre::Result<Vec<A>> {
        (**self).fetch(root, hint, checksums, context).await
    }
}
