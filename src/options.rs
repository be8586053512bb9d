use std::time::SystemTime;

/// Per-client (or per-request) settings for signing and verification.
///
/// All fields are optional.  Options are built with chained setters:
///
/// ```
/// use hawk_sign::Options;
/// let options = Options::new()
///     .ext("some-app-ext-data")
///     .payload("{\"a\": 1}")
///     .content_type("application/json")
///     .required(true);
/// assert_eq!(options.ext.as_deref(), Some("some-app-ext-data"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Use this timestamp instead of the current time.
    pub timestamp: Option<SystemTime>,
    /// Seconds to add to the local clock when generating a timestamp.
    pub local_time_offset_sec: i64,
    /// Use this nonce instead of generating one.  An empty nonce is ignored.
    pub nonce: Option<String>,
    /// Pre-computed payload hash (base64).  Takes precedence over `payload`.
    pub hash: Option<String>,
    /// Application-specific data, signed and sent in the `ext` attribute.
    pub ext: Option<String>,
    /// Application id, for delegated requests.
    pub app: Option<String>,
    /// Delegating application id; only sent alongside `app`.
    pub dlg: Option<String>,
    /// Payload to hash when signing, and to check against the response `hash` attribute.
    pub payload: Option<String>,
    /// Content type of the request payload.
    pub content_type: Option<String>,
    /// Treat a response without `Server-Authorization` as not authentic.
    pub required: bool,
}

impl Options {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn timestamp(mut self, ts: SystemTime) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn local_time_offset_sec(mut self, offset: i64) -> Self {
        self.local_time_offset_sec = offset;
        self
    }

    pub fn nonce<S: Into<String>>(mut self, nonce: S) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn ext<S: Into<String>>(mut self, ext: S) -> Self {
        self.ext = Some(ext.into());
        self
    }

    pub fn app<S: Into<String>>(mut self, app: S) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn dlg<S: Into<String>>(mut self, dlg: S) -> Self {
        self.dlg = Some(dlg.into());
        self
    }

    pub fn payload<S: Into<String>>(mut self, payload: S) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
