use crate::error::*;
use crate::options::Options;
use crate::payload::PayloadHasher;
use crate::DigestAlgorithm;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Length of generated nonces, in characters.
const NONCE_LEN: usize = 10;

/// The facts covered by a Hawk request MAC.
///
/// Artifacts are captured when a request is signed and must be reused, unchanged, to check the
/// server's response to that same request.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub method: String,
    /// Path plus `?query`, exactly as sent.
    pub resource: String,
    pub host: String,
    pub port: u16,
    pub ts: SystemTime,
    pub nonce: String,
    pub hash: Option<String>,
    pub ext: Option<String>,
    pub app: Option<String>,
    pub dlg: Option<String>,
}

impl Artifacts {
    /// The timestamp in whole seconds since the epoch, as it appears on the wire.
    pub fn ts_secs(&self) -> u64 {
        self.ts
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Builds `Artifacts` for a single request.
///
/// # Examples
///
/// ```
/// use hawk_sign::{ArtifactBuilder, Options, SHA256};
/// let artifacts = ArtifactBuilder::new("GET", "/resource?a=1", "example.com", "https")
///     .build(&Options::new().nonce("j4h3g2"), SHA256)
///     .unwrap();
/// assert_eq!(artifacts.port, 443);
/// assert_eq!(artifacts.nonce, "j4h3g2");
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactBuilder<'a> {
    method: &'a str,
    resource: &'a str,
    host: &'a str,
    scheme: &'a str,
    port: Option<u16>,
}

impl<'a> ArtifactBuilder<'a> {
    pub fn new(method: &'a str, resource: &'a str, host: &'a str, scheme: &'a str) -> Self {
        ArtifactBuilder {
            method,
            resource,
            host,
            scheme,
            port: None,
        }
    }

    /// Set an explicit port.  Without one, the scheme's default port is used.
    pub fn port<P: Into<Option<u16>>>(mut self, port: P) -> Self {
        self.port = port.into();
        self
    }

    /// Build the artifacts, generating a nonce from the operating system's random source
    /// if the options do not supply one.
    pub fn build(self, options: &Options, algorithm: DigestAlgorithm) -> Result<Artifacts> {
        self.build_with_rng(options, algorithm, &mut OsRng)
    }

    /// Build the artifacts, generating any nonce from the given random source.
    pub fn build_with_rng<R>(
        self,
        options: &Options,
        algorithm: DigestAlgorithm,
        rng: &mut R,
    ) -> Result<Artifacts>
    where
        R: RngCore + CryptoRng,
    {
        let port = match self.port {
            Some(port) => port,
            None => default_port(self.scheme)
                .ok_or_else(|| Error::MissingPort(self.scheme.to_string()))?,
        };

        let ts = match options.timestamp {
            Some(ts) => ts,
            None => offset_time(SystemTime::now(), options.local_time_offset_sec),
        };

        let nonce = match options.nonce {
            Some(ref nonce) if !nonce.is_empty() => nonce.clone(),
            _ => generate_nonce(rng),
        };

        let hash = match (non_empty(&options.hash), non_empty(&options.payload)) {
            (Some(hash), _) => Some(hash),
            (None, Some(payload)) => Some(PayloadHasher::hash(
                options.content_type.as_deref().unwrap_or(""),
                algorithm,
                payload,
            )?),
            (None, None) => None,
        };

        Ok(Artifacts {
            method: self.method.to_string(),
            resource: self.resource.to_string(),
            host: self.host.to_string(),
            port,
            ts,
            nonce,
            hash,
            ext: non_empty(&options.ext),
            app: non_empty(&options.app),
            dlg: non_empty(&options.dlg),
        })
    }
}

/// The default port for a URL scheme, if it has one Hawk knows about.
pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

fn offset_time(now: SystemTime, offset_sec: i64) -> SystemTime {
    let delta = Duration::from_secs(offset_sec.wrapping_abs() as u64);
    if offset_sec >= 0 {
        now.checked_add(delta).unwrap_or(now)
    } else {
        now.checked_sub(delta).unwrap_or(UNIX_EPOCH)
    }
}

fn generate_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    (0..NONCE_LEN).map(|_| rng.sample(Alphanumeric)).collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(all(test, feature = "use_ring"))]
mod test {
    use super::*;
    use crate::SHA256;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn builder() -> ArtifactBuilder<'static> {
        ArtifactBuilder::new("POST", "/resource?a=1&b=2", "example.com", "http")
    }

    #[test]
    fn test_explicit_values() {
        let ts = UNIX_EPOCH + Duration::new(1353832234, 0);
        let options = Options::new()
            .timestamp(ts)
            .nonce("dj83hs9djc")
            .hash("abc=")
            .ext("some-ext")
            .app("my-app")
            .dlg("my-authority");
        let artifacts = builder().port(8000).build(&options, SHA256).unwrap();
        assert_eq!(
            artifacts,
            Artifacts {
                method: "POST".to_string(),
                resource: "/resource?a=1&b=2".to_string(),
                host: "example.com".to_string(),
                port: 8000,
                ts,
                nonce: "dj83hs9djc".to_string(),
                hash: Some("abc=".to_string()),
                ext: Some("some-ext".to_string()),
                app: Some("my-app".to_string()),
                dlg: Some("my-authority".to_string()),
            }
        );
        assert_eq!(artifacts.ts_secs(), 1353832234);
    }

    #[test]
    fn test_default_ports() {
        let options = Options::new();
        let http = ArtifactBuilder::new("GET", "/", "example.com", "http")
            .build(&options, SHA256)
            .unwrap();
        assert_eq!(http.port, 80);
        let https = ArtifactBuilder::new("GET", "/", "example.com", "https")
            .build(&options, SHA256)
            .unwrap();
        assert_eq!(https.port, 443);
    }

    #[test]
    fn test_unknown_scheme_needs_port() {
        let res = ArtifactBuilder::new("GET", "/", "example.com", "gopher").build(&Options::new(), SHA256);
        match res {
            Err(Error::MissingPort(scheme)) => assert_eq!(scheme, "gopher"),
            other => panic!("unexpected {:?}", other),
        }
        let res = ArtifactBuilder::new("GET", "/", "example.com", "gopher")
            .port(70)
            .build(&Options::new(), SHA256);
        assert_eq!(res.unwrap().port, 70);
    }

    #[test]
    fn test_generated_nonce() {
        let a = builder().build(&Options::new(), SHA256).unwrap();
        let b = builder().build(&Options::new().nonce(""), SHA256).unwrap();
        assert_eq!(a.nonce.len(), NONCE_LEN);
        assert!(a.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(b.nonce.len(), NONCE_LEN);
        assert!(a.nonce != b.nonce);
    }

    #[test]
    fn test_injected_rng_is_used() {
        let a = builder()
            .build_with_rng(&Options::new(), SHA256, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = builder()
            .build_with_rng(&Options::new(), SHA256, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a.nonce, b.nonce);
    }

    #[test]
    fn test_local_time_offset() {
        let before = SystemTime::now();
        let a = builder()
            .build(&Options::new().local_time_offset_sec(3600), SHA256)
            .unwrap();
        assert!(a.ts >= before + Duration::from_secs(3600));

        let b = builder()
            .build(&Options::new().local_time_offset_sec(-3600), SHA256)
            .unwrap();
        assert!(b.ts <= SystemTime::now() - Duration::from_secs(3599));
    }

    #[test]
    fn test_explicit_timestamp_ignores_offset() {
        let ts = UNIX_EPOCH + Duration::new(1000, 0);
        let a = builder()
            .build(&Options::new().timestamp(ts).local_time_offset_sec(60), SHA256)
            .unwrap();
        assert_eq!(a.ts, ts);
    }

    #[test]
    fn test_payload_hash() {
        let options = Options::new()
            .payload("something to write about")
            .content_type("text/plain");
        let a = builder().build(&options, SHA256).unwrap();
        assert_eq!(
            a.hash.as_deref(),
            Some("2QfCt3GuY9HQnHWyWD3wX68ZOKbynqlfYmuO2ZBRqtY=")
        );

        // an explicit hash wins
        let a = builder().build(&options.clone().hash("xyz="), SHA256).unwrap();
        assert_eq!(a.hash.as_deref(), Some("xyz="));

        // an empty payload is not hashed
        let a = builder().build(&Options::new().payload(""), SHA256).unwrap();
        assert_eq!(a.hash, None);
    }

    #[test]
    fn test_empty_optional_fields_are_absent() {
        let options = Options::new().ext("").app("").dlg("");
        let a = builder().build(&options, SHA256).unwrap();
        assert_eq!(a.ext, None);
        assert_eq!(a.app, None);
        assert_eq!(a.dlg, None);
    }
}
