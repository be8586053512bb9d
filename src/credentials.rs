use crate::crypto::{self, HmacKey};
use crate::error::*;
use std::fmt;
use std::str::FromStr;

/// Hash algorithms usable for Hawk MACs and payload hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

pub const SHA1: DigestAlgorithm = DigestAlgorithm::Sha1;
pub const SHA256: DigestAlgorithm = DigestAlgorithm::Sha256;
pub const SHA384: DigestAlgorithm = DigestAlgorithm::Sha384;
pub const SHA512: DigestAlgorithm = DigestAlgorithm::Sha512;

impl FromStr for DigestAlgorithm {
    type Err = Error;

    /// Parse an algorithm name as used by other Hawk implementations (`"sha256"`).  Names are
    /// matched case-insensitively and an optional dash is allowed (`"SHA-256"`).
    fn from_str(name: &str) -> Result<DigestAlgorithm> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        })
    }
}

/// Hawk key.
///
/// While any sequence of bytes can be specified as a key, note that each digest algorithm has
/// a suggested key length, and that passwords should *not* be used as keys.  Keys of incorrect
/// length are handled according to the digest's implementation.
pub struct Key {
    algorithm: DigestAlgorithm,
    inner: Box<dyn HmacKey>,
}

impl Key {
    pub fn new<B>(key: B, algorithm: DigestAlgorithm) -> Result<Key>
    where
        B: AsRef<[u8]>,
    {
        let inner = crypto::get_cryptographer().new_key(algorithm, key.as_ref())?;
        Ok(Key { algorithm, inner })
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.inner.sign(data)?)
    }

    /// The digest algorithm this key signs with; payload hashes use the same one.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Hawk credentials: an ID and a key associated with that ID.  The digest algorithm
/// must be agreed between the server and the client.
#[derive(Debug)]
pub struct Credentials {
    pub id: String,
    pub key: Key,
}

impl Credentials {
    /// Build credentials from an id, the raw key, and an algorithm name such as `"sha256"`.
    ///
    /// An algorithm name this crate does not know is reported as
    /// `Error::UnsupportedAlgorithm`; that is a configuration mistake rather than an
    /// authentication failure.
    pub fn new<S, B>(id: S, key: B, algorithm: &str) -> Result<Credentials>
    where
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        let algorithm = algorithm.parse::<DigestAlgorithm>()?;
        Ok(Credentials {
            id: id.into(),
            key: Key::new(key, algorithm)?,
        })
    }
}
