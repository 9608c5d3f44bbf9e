use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;

/// Which part of an asset tree a request is about.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetScope {
    /// Any asset reachable from the root
    #[default]
    Full,
    /// Only the root asset itself
    Root,
    /// Assets below a given anchor
    Subtree,
}

/// Opaque classification tag forwarded untouched to an asset source.
///
/// Sources may use it to batch or route requests; the synchronization engine
/// never looks inside.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHint {
    scope: AssetScope,
    anchor: Option<Checksum>,
}

impl AssetHint {
    pub const FULL: Self = Self {
        scope: AssetScope::Full,
        anchor: None,
    };

    pub const ROOT: Self = Self {
        scope: AssetScope::Root,
        anchor: None,
    };

    #[must_use]
    pub const fn subtree(anchor: Checksum) -> Self {
        Self {
            scope: AssetScope::Subtree,
            anchor: Some(anchor),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> AssetScope {
        self.scope
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<Checksum> {
        self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_keeps_anchor() {
        let anchor = Checksum::of(b"project");
        let hint = AssetHint::subtree(anchor);

        assert_eq!(hint.scope(), AssetScope::Subtree);
        assert_eq!(hint.anchor(), Some(anchor));
    }

    #[test]
    fn test_default_is_full() {
        assert_eq!(AssetHint::default(), AssetHint::FULL);
        assert_eq!(AssetHint::ROOT.anchor(), None);
    }
}
