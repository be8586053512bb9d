use crate::crypto;
use crate::error::{Error, ParseError};
use crate::header::{parse_attributes, SERVER_AUTHORIZATION_ATTRIBUTES, WWW_AUTHENTICATE_ATTRIBUTES};
use crate::mac::{Mac, MacType};
use crate::payload::PayloadHasher;
use crate::request::SigningContext;
use crate::transport::IncomingResponse;
use failure::Fail;
use std::convert::TryFrom;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Why a response was judged not authentic.
#[derive(Fail, Debug, Clone, PartialEq)]
pub enum Failure {
    #[fail(display = "Invalid WWW-Authenticate header: {}", _0)]
    WwwAuthenticate(#[fail(cause)] ParseError),

    #[fail(display = "WWW-Authenticate timestamp MAC does not match")]
    TimestampMac,

    #[fail(display = "Server-Authorization header is required but missing")]
    MissingServerAuthorization,

    #[fail(display = "Invalid Server-Authorization header: {}", _0)]
    ServerAuthorization(#[fail(cause)] ParseError),

    #[fail(display = "Server-Authorization MAC does not match")]
    Mac,

    #[fail(display = "Server-Authorization does not include a payload hash")]
    MissingHash,

    #[fail(display = "Response payload hash does not match")]
    Hash,

    #[fail(display = "Cryptography failure: {}", _0)]
    Crypto(String),
}

/// The outcome of verifying one response.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    failure: Option<Failure>,
    server_ts: Option<SystemTime>,
}

impl Verdict {
    /// True if every check that applied to the response passed.
    pub fn is_authentic(&self) -> bool {
        self.failure.is_none()
    }

    /// The check that failed, if any.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// The server's clock, if it advertised a correctly signed timestamp in
    /// `WWW-Authenticate`.
    pub fn server_ts(&self) -> Option<SystemTime> {
        self.server_ts
    }

    /// Seconds to add to `now` to match the server's advertised clock, suitable for
    /// `Options::local_time_offset_sec` when retrying the request.
    pub fn local_time_offset_sec(&self, now: SystemTime) -> Option<i64> {
        let server_ts = self.server_ts?;
        match server_ts.duration_since(now) {
            Ok(ahead) => signed_secs(ahead, false),
            Err(behind) => signed_secs(behind.duration(), true),
        }
    }
}

impl<'a> SigningContext<'a> {
    /// Verify the server's response to the request this context signed.
    ///
    /// The checks run in order, stopping at the first failure:
    ///
    ///  * a `WWW-Authenticate` header, if present, must parse, and a `ts` attribute in it must
    ///    carry a matching `tsm`.  A correctly signed `ts` that is not a representable
    ///    count of seconds is also treated as an unparseable header;
    ///  * a missing `Server-Authorization` header is accepted unless `Options::required` is set;
    ///  * the `Server-Authorization` MAC must match the response MAC for this request, using
    ///    the response's own `hash` and `ext`;
    ///  * if `Options::payload` is set, the response must carry a `hash` matching that payload
    ///    hashed with the response `Content-Type`.
    pub fn verify<R>(&self, response: &R) -> Verdict
    where
        R: IncomingResponse + ?Sized,
    {
        let mut server_ts = None;
        let failure = self.check(response, &mut server_ts).err();
        if let Some(ref failure) = failure {
            debug!(
                "response to {} {} not authentic: {}",
                self.artifacts.method, self.artifacts.resource, failure
            );
        }
        Verdict { failure, server_ts }
    }

    fn check<R>(&self, response: &R, server_ts: &mut Option<SystemTime>) -> Result<(), Failure>
    where
        R: IncomingResponse + ?Sized,
    {
        let key = &self.credentials.key;

        if let Some(www_authenticate) = response.header("www-authenticate") {
            let attributes = parse_attributes(www_authenticate, WWW_AUTHENTICATE_ATTRIBUTES)
                .map_err(Failure::WwwAuthenticate)?;
            if let Some(ts) = attributes.get("ts") {
                let expected = Mac::timestamp(key, ts).map_err(crypto_failure)?;
                let received = attributes
                    .get("tsm")
                    .and_then(|tsm| Mac::from_base64(tsm).ok())
                    .ok_or(Failure::TimestampMac)?;
                if expected != received {
                    return Err(Failure::TimestampMac);
                }
                let bad_ts = || Failure::WwwAuthenticate(ParseError::BadValue("ts".to_string()));
                let secs = ts.parse::<u64>().map_err(|_| bad_ts())?;
                let advertised = UNIX_EPOCH
                    .checked_add(Duration::from_secs(secs))
                    .ok_or_else(bad_ts)?;
                *server_ts = Some(advertised);
            }
        }

        let server_authorization = match response.header("server-authorization") {
            Some(value) => value,
            None if self.options.required => return Err(Failure::MissingServerAuthorization),
            None => return Ok(()),
        };
        let attributes = parse_attributes(server_authorization, SERVER_AUTHORIZATION_ATTRIBUTES)
            .map_err(Failure::ServerAuthorization)?;

        let mut artifacts = self.artifacts.clone();
        artifacts.hash = attributes.get("hash").map(str::to_string);
        artifacts.ext = attributes.get("ext").map(str::to_string);
        let expected = Mac::new(MacType::Response, key, &artifacts).map_err(crypto_failure)?;
        let received = attributes
            .get("mac")
            .and_then(|mac| Mac::from_base64(mac).ok())
            .ok_or(Failure::Mac)?;
        if expected != received {
            return Err(Failure::Mac);
        }

        let payload = match self.options.payload {
            Some(ref payload) => payload,
            None => return Ok(()),
        };
        let hash = attributes.get("hash").ok_or(Failure::MissingHash)?;
        let calculated = PayloadHasher::hash(
            response.header("content-type").unwrap_or(""),
            key.algorithm(),
            payload,
        )
        .map_err(crypto_failure)?;
        if !crypto::get_cryptographer().constant_time_compare(calculated.as_bytes(), hash.as_bytes())
        {
            return Err(Failure::Hash);
        }

        Ok(())
    }
}

/// Whole seconds as an `i64`, or `None` if they do not fit.
fn signed_secs(d: Duration, negative: bool) -> Option<i64> {
    let secs = i64::try_from(d.as_secs()).ok()?;
    Some(if negative { -secs } else { secs })
}

fn crypto_failure(e: Error) -> Failure {
    Failure::Crypto(e.to_string())
}
