//! `hawk-sign` must be able to hash, sign, and compare MACs. The actual
//! primitives are provided by a `Cryptographer`, which by default is backed by
//! `ring` (feature `use_ring`). Another backend can be installed with
//! [`set_cryptographer`] before any signing takes place.
use crate::DigestAlgorithm;
use failure::Fail;

pub(crate) mod holder;
pub(crate) use holder::get_cryptographer;
pub use holder::{set_boxed_cryptographer, set_cryptographer, SetCryptographerError};

#[cfg(feature = "use_ring")]
mod ring;

#[derive(Fail, Debug)]
pub enum CryptoError {
    /// The configured cryptographer does not support the digest algorithm.
    #[fail(display = "Digest algorithm {:?} is unsupported by this Cryptographer", _0)]
    UnsupportedDigest(DigestAlgorithm),

    /// The backend failed for some other reason.
    #[fail(display = "{}", _0)]
    Other(failure::Error),
}

/// A keyed MAC, as produced by `Cryptographer::new_key`.
pub trait HmacKey: Send + Sync + 'static {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// An incremental hasher. `finish` may only be called once.
pub trait Hasher: Send + Sync + 'static {
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;
    fn finish(&mut self) -> Result<Vec<u8>, CryptoError>;
}

/// The set of primitives this crate needs from a cryptography backend.
pub trait Cryptographer: Send + Sync + 'static {
    fn new_key(&self, algorithm: DigestAlgorithm, key: &[u8]) -> Result<Box<dyn HmacKey>, CryptoError>;
    fn new_hasher(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Hasher>, CryptoError>;
    /// Compare two byte strings in time independent of their contents.
    fn constant_time_compare(&self, a: &[u8], b: &[u8]) -> bool;
}
