use crate::crypto::{self, Hasher};
use crate::error::*;
use crate::DigestAlgorithm;

/// Reduce a `Content-Type` value to the form Hawk hashes: the media type before any
/// parameters, trimmed and lower-cased.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// A utility for hashing payloads. Feed your entity body to this, then pass the `finish`
/// result to the request options or compare it to a response's `hash` attribute.
pub struct PayloadHasher {
    hasher: Box<dyn Hasher>,
}

impl PayloadHasher {
    /// Create a new PayloadHasher. The `content_type` is normalized as by
    /// `normalize_content_type`. The digest should be the one used for the credentials.
    pub fn new<B>(content_type: B, algorithm: DigestAlgorithm) -> Result<Self>
    where
        B: AsRef<str>,
    {
        let mut hasher = PayloadHasher {
            hasher: crypto::get_cryptographer().new_hasher(algorithm)?,
        };
        hasher.update(b"hawk.1.payload\n")?;
        hasher.update(normalize_content_type(content_type.as_ref()).as_bytes())?;
        hasher.update(b"\n")?;
        Ok(hasher)
    }

    /// Hash a single value and return the base64-encoded digest.
    pub fn hash<B1, B2>(content_type: B1, algorithm: DigestAlgorithm, payload: B2) -> Result<String>
    where
        B1: AsRef<str>,
        B2: AsRef<[u8]>,
    {
        let mut hasher = PayloadHasher::new(content_type, algorithm)?;
        hasher.update(payload)?;
        hasher.finish()
    }

    /// Update the hash with new data.
    pub fn update<B>(&mut self, data: B) -> Result<()>
    where
        B: AsRef<[u8]>,
    {
        self.hasher.update(data.as_ref())?;
        Ok(())
    }

    /// Finish hashing and return the base64-encoded digest.
    pub fn finish(mut self) -> Result<String> {
        self.update(b"\n")?;
        Ok(base64::encode(self.hasher.finish()?))
    }
}
