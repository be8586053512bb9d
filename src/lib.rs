//! The `hawk-sign` crate signs outgoing HTTP requests and verifies server
//! responses using the [Hawk](https://github.com/hueniverse/hawk) scheme.
//!
//! The crate does not perform any I/O. An HTTP client calls it twice per request: once before
//! sending, to attach the `Authorization` header, and once after the response headers arrive,
//! to check the server's `Server-Authorization` counter-signature.
//!
//! # Examples
//!
//! ## Signing a request and verifying the response
//!
//! ```
//! use hawk_sign::{Client, Credentials, Options, OutgoingRequest, ResponseHeaders, UrlRequest};
//!
//! let credentials = Credentials::new(
//!     "dh37fgj492je",
//!     "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn",
//!     "sha256",
//! ).unwrap();
//! let client = Client::new(credentials, Options::new().ext("my-ext-value"));
//!
//! let mut request = UrlRequest::parse("POST", "https://example.com/resource?a=1").unwrap();
//! let context = client.sign(&mut request).unwrap();
//!
//! let header = request.authorization().unwrap();
//! assert!(header.starts_with("Hawk id=\"dh37fgj492je\", ts=\""));
//! assert!(header.contains(", ext=\"my-ext-value\", mac=\""));
//!
//! // ..send the request; this server did not sign its response, which is
//! // accepted unless `Options::required` was set.
//! let response = ResponseHeaders::new().with("Content-Type", "text/plain");
//! assert!(context.verify(&response).is_authentic());
//! ```
//!
//! ## Requiring server authentication
//!
//! ```
//! use hawk_sign::{Client, Credentials, Failure, Options, ResponseHeaders, UrlRequest};
//!
//! let credentials = Credentials::new("me", "a-secret-key", "sha256").unwrap();
//! let client = Client::new(credentials, Options::new().required(true));
//! let mut request = UrlRequest::parse("GET", "http://localhost:8000/").unwrap();
//! let context = client.sign(&mut request).unwrap();
//!
//! let verdict = context.verify(&ResponseHeaders::new());
//! assert!(!verdict.is_authentic());
//! assert_eq!(verdict.failure(), Some(&Failure::MissingServerAuthorization));
//! ```

#[macro_use]
extern crate log;

mod artifacts;
pub use crate::artifacts::{ArtifactBuilder, Artifacts};

mod credentials;
pub use crate::credentials::{Credentials, DigestAlgorithm, Key};

pub mod crypto;

mod error;
pub use crate::error::{Error, ParseError, Result};

mod header;
pub use crate::header::{
    parse_attributes, AuthAttributes, Header, ServerAuthorization, REQUEST_ATTRIBUTES,
    SERVER_AUTHORIZATION_ATTRIBUTES, WWW_AUTHENTICATE_ATTRIBUTES,
};

mod mac;
pub use crate::mac::{Mac, MacType};

mod options;
pub use crate::options::Options;

mod payload;
pub use crate::payload::{normalize_content_type, PayloadHasher};

mod request;
pub use crate::request::{Client, SigningContext};

mod response;
pub use crate::response::{Failure, Verdict};

mod transport;
pub use crate::transport::{IncomingResponse, OutgoingRequest, ResponseHeaders, UrlRequest};

pub use crate::credentials::{SHA1, SHA256, SHA384, SHA512};
