#[cfg(test)]
#[path = "tests/checksum.rs"]
mod tests;

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

use sha2::Digest;
use thiserror::Error;

pub const BYTES_LEN: usize = 32;

/// Content hash of an asset.
///
/// Two assets with equal checksums are value-identical. The all-zero value is
/// reserved as [`Checksum::NULL`] and never identifies real content.
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checksum {
    bytes: [u8; BYTES_LEN],
}

impl Checksum {
    /// The "no value" sentinel.
    pub const NULL: Self = Self {
        bytes: [0; BYTES_LEN],
    };

    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self {
            bytes: sha2::Sha256::digest(data).into(),
        }
    }

    pub fn of_json<T: serde::Serialize>(data: &T) -> serde_json::Result<Self> {
        let mut hasher = sha2::Sha256::default();

        serde_json::to_writer(&mut hasher, data)?;

        Ok(Self {
            bytes: hasher.finalize().into(),
        })
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTES_LEN] {
        &self.bytes
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Base58 text form, also used as the on-disk file name of a blob.
    #[must_use]
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }
}

impl From<[u8; BYTES_LEN]> for Checksum {
    fn from(bytes: [u8; BYTES_LEN]) -> Self {
        Self { bytes }
    }
}

impl From<Checksum> for [u8; BYTES_LEN] {
    fn from(checksum: Checksum) -> Self {
        checksum.bytes
    }
}

impl Deref for Checksum {
    type Target = [u8; BYTES_LEN];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_base58())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Checksum(null)");
        }

        f.debug_tuple("Checksum").field(&self.to_base58()).finish()
    }
}

#[derive(Clone, Copy, Debug, Error)]
pub enum Error {
    #[error("invalid checksum length")]
    InvalidLength,

    #[error("invalid base58")]
    DecodeError(#[from] bs58::decode::Error),
}

impl FromStr for Checksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0; BYTES_LEN];

        match bs58::decode(s).onto(&mut bytes) {
            Ok(len) if len == BYTES_LEN => Ok(Self { bytes }),
            Ok(_) | Err(bs58::decode::Error::BufferTooSmall) => Err(Error::InvalidLength),
            Err(err) => Err(Error::DecodeError(err)),
        }
    }
}

impl serde::Serialize for Checksum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> serde::Deserialize<'de> for Checksum {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChecksumVisitor;

        impl serde::de::Visitor<'_> for ChecksumVisitor {
            type Value = Checksum;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a base58 encoded checksum")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v.parse() {
                    Ok(checksum) => Ok(checksum),
                    Err(Error::InvalidLength) => Err(E::invalid_length(v.len(), &self)),
                    Err(err) => Err(E::custom(err)),
                }
            }
        }

        deserializer.deserialize_str(ChecksumVisitor)
    }
}
