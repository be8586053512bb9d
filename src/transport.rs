//! The seam between this crate and an HTTP client.
//!
//! A client exposes its outgoing request through `OutgoingRequest` and its response headers
//! through `IncomingResponse`.  `UrlRequest` and `ResponseHeaders` are small implementations
//! for clients that do not have their own types handy.
use crate::error::*;
use url::Url;

/// What signing needs to know about a request before it is sent.
pub trait OutgoingRequest {
    fn method(&self) -> &str;

    /// The URL scheme, used to pick a default port.
    fn scheme(&self) -> &str;

    fn host(&self) -> Option<&str>;

    /// The port, if one was given explicitly.
    fn port(&self) -> Option<u16>;

    /// The path, followed by `?` and the query if there is one.
    fn resource(&self) -> String;

    /// The current `Authorization` header, if any.
    fn authorization(&self) -> Option<&str>;

    fn set_authorization(&mut self, value: String);
}

/// Header lookup on a received response.  Names are matched case-insensitively.
pub trait IncomingResponse {
    fn header(&self, name: &str) -> Option<&str>;
}

/// A request described by a method and a `url::Url`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRequest {
    method: String,
    url: Url,
    authorization: Option<String>,
}

impl UrlRequest {
    pub fn new<S: Into<String>>(method: S, url: Url) -> Self {
        UrlRequest {
            method: method.into(),
            url,
            authorization: None,
        }
    }

    /// Parse `url` and build a request for it.
    pub fn parse<S: Into<String>>(method: S, url: &str) -> Result<Self> {
        Ok(UrlRequest::new(method, Url::parse(url)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl OutgoingRequest for UrlRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn scheme(&self) -> &str {
        self.url.scheme()
    }

    fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    fn port(&self) -> Option<u16> {
        self.url.port()
    }

    fn resource(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    fn set_authorization(&mut self, value: String) {
        self.authorization = Some(value);
    }
}

/// Response headers as a list of name/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseHeaders(Vec<(String, String)>);

impl ResponseHeaders {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a header, returning the updated set.
    pub fn with<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.0.push((name.into(), value.into()));
    }
}

impl IncomingResponse for ResponseHeaders {
    fn header(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
