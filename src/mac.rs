use crate::artifacts::Artifacts;
use crate::credentials::Key;
use crate::crypto;
use crate::error::*;
use std::fmt::Write;
use std::ops::Deref;

/// The kind of MAC calculation (corresponding to the first line of the message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacType {
    Header,
    Response,
}

impl MacType {
    fn token(self) -> &'static str {
        match self {
            MacType::Header => "hawk.1.header",
            MacType::Response => "hawk.1.response",
        }
    }
}

/// Mac represents a message authentication code, the signature in a Hawk transaction.
///
/// This class supports creating Macs using the Hawk specification, and comparing Macs
/// using a constant-time comparison (thus preventing timing side-channel attacks).
#[derive(Debug, Clone)]
pub struct Mac(Vec<u8>);

impl Mac {
    /// Compute the MAC over the canonical string for `artifacts`.
    pub fn new(mac_type: MacType, key: &Key, artifacts: &Artifacts) -> Result<Mac> {
        let normalized = normalized_string(mac_type, artifacts);
        Ok(Mac(key.sign(normalized.as_bytes())?))
    }

    /// Compute the `tsm` MAC a server uses to vouch for the timestamp it advertises in
    /// `WWW-Authenticate`.
    pub fn timestamp(key: &Key, ts: &str) -> Result<Mac> {
        Ok(Mac(key.sign(format!("hawk.1.ts\n{}\n", ts).as_bytes())?))
    }

    /// Decode a base64 MAC as found in a header attribute.
    pub fn from_base64(encoded: &str) -> Result<Mac> {
        Ok(Mac(base64::decode(encoded)?))
    }

    /// The base64 form used in headers.
    pub fn to_base64(&self) -> String {
        base64::encode(&self.0)
    }
}

/// Build the newline-terminated string that Hawk MACs are computed over.
///
/// The `app` and `dlg` lines are only present when `app` is set; absent `hash` and `ext`
/// become empty lines.
pub(crate) fn normalized_string(mac_type: MacType, artifacts: &Artifacts) -> String {
    let mut buffer = String::new();
    // writing to a String cannot fail
    let _ = write!(
        buffer,
        "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
        mac_type.token(),
        artifacts.ts_secs(),
        artifacts.nonce,
        artifacts.method.to_ascii_uppercase(),
        artifacts.resource,
        artifacts.host,
        artifacts.port,
        artifacts.hash.as_deref().unwrap_or(""),
        artifacts.ext.as_deref().unwrap_or(""),
    );
    if let Some(ref app) = artifacts.app {
        let _ = write!(
            buffer,
            "{}\n{}\n",
            app,
            artifacts.dlg.as_deref().unwrap_or("")
        );
    }
    buffer
}

impl AsRef<[u8]> for Mac {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<Vec<u8>> for Mac {
    fn from(original: Vec<u8>) -> Self {
        Mac(original)
    }
}

impl Deref for Mac {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl PartialEq for Mac {
    fn eq(&self, other: &Mac) -> bool {
        crypto::get_cryptographer().constant_time_compare(&self.0, &other.0)
    }
}

#[cfg(all(test, feature = "use_ring"))]
mod test {
    use super::*;
    use crate::credentials::Key;
    use crate::SHA256;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, UNIX_EPOCH};

    const KEY: &str = "werxhqb98rpaxn39848xrunpaw3489ruxnpaw3489ruxnpaw3489";

    fn key() -> Key {
        Key::new(KEY, SHA256).unwrap()
    }

    fn artifacts() -> Artifacts {
        Artifacts {
            method: "post".to_string(),
            resource: "/resource?a=1&b=2".to_string(),
            host: "example.com".to_string(),
            port: 8000,
            ts: UNIX_EPOCH + Duration::new(1353832234, 100),
            nonce: "dj83hs9djc".to_string(),
            hash: None,
            ext: None,
            app: None,
            dlg: None,
        }
    }

    #[test]
    fn test_normalized_string() {
        assert_eq!(
            normalized_string(MacType::Header, &artifacts()),
            "hawk.1.header\n1353832234\ndj83hs9djc\nPOST\n/resource?a=1&b=2\nexample.com\n8000\n\n\n"
        );
    }

    #[test]
    fn test_normalized_string_app_dlg() {
        let mut a = artifacts();
        a.hash = Some("hash=".to_string());
        a.ext = Some("ext".to_string());
        a.app = Some("app".to_string());
        assert_eq!(
            normalized_string(MacType::Response, &a),
            "hawk.1.response\n1353832234\ndj83hs9djc\nPOST\n/resource?a=1&b=2\nexample.com\n8000\nhash=\next\napp\n\n"
        );

        // dlg without app is not signed
        let mut a = artifacts();
        a.dlg = Some("dlg".to_string());
        assert!(!normalized_string(MacType::Header, &a).contains("dlg"));
    }

    #[test]
    fn test_make_mac() {
        let mac = Mac::new(MacType::Header, &key(), &artifacts()).unwrap();
        assert_eq!(mac.to_base64(), "WpgGPpiz5a6n5c7R98wUzWbvgklqWnyIPaI783FD4Ug=");
    }

    #[test]
    fn test_make_mac_deterministic() {
        let a = Mac::new(MacType::Header, &key(), &artifacts()).unwrap();
        let b = Mac::new(MacType::Header, &key(), &artifacts()).unwrap();
        assert_eq!(a.to_base64(), b.to_base64());
        assert!(a == b);
    }

    #[test]
    fn test_make_mac_ext() {
        let mut a = artifacts();
        a.ext = Some("some-app-ext-data".to_string());
        let mac = Mac::new(MacType::Header, &key(), &a).unwrap();
        assert_eq!(mac.to_base64(), "BQdMHSu9+cPEunxOPmgSC7Mq3xTFWdnh64J7njjhPJs=");
    }

    #[test]
    fn test_make_mac_app_dlg() {
        let mut a = artifacts();
        a.app = Some("my-app".to_string());
        a.dlg = Some("my-authority".to_string());
        let mac = Mac::new(MacType::Header, &key(), &a).unwrap();
        assert_eq!(mac.to_base64(), "MnzhSg67U/YBHc4ezDXGIsSvc12744viFji9Qf5NjY4=");
    }

    #[test]
    fn test_make_mac_response() {
        let mut a = artifacts();
        a.ext = Some("response-specific".to_string());
        let mac = Mac::new(MacType::Response, &key(), &a).unwrap();
        assert_eq!(mac.to_base64(), "QKD0TH0BxZXGB3OGs8xh4AVvnmb/iw3ecMacUpaBiy4=");
    }

    #[test]
    fn test_timestamp_mac() {
        let mac = Mac::timestamp(&key(), "1353832234").unwrap();
        assert_eq!(mac.to_base64(), "8yf6uOpwHm+IoMIgoFnId2d86yhBqFuES7VhhfrvFX4=");
    }

    #[test]
    fn test_mac_eq() {
        let a = Mac::from(vec![1, 2, 3]);
        assert!(a == Mac::from(vec![1, 2, 3]));
        assert!(a != Mac::from(vec![1, 2, 4]));
        assert!(a != Mac::from(vec![1, 2]));
    }

    #[test]
    fn test_from_base64() {
        let mac = Mac::from_base64("AQID").unwrap();
        assert_eq!(*mac, vec![1, 2, 3]);
        assert!(Mac::from_base64("not base64!").is_err());
    }
}
