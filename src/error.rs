use crate::crypto::CryptoError;
use failure::Fail;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "Unsupported digest algorithm: {}", _0)]
    UnsupportedAlgorithm(String),

    #[fail(display = "Invalid url: {}", _0)]
    InvalidUrl(String),

    #[fail(display = "Request has no host")]
    MissingHost,

    #[fail(display = "No port given and no default port for scheme `{}`", _0)]
    MissingPort(String),

    #[fail(display = "Request already carries an Authorization header")]
    AuthorizationPresent,

    #[fail(display = "Unparseable Hawk header: {}", _0)]
    HeaderParse(#[fail(cause)] ParseError),

    #[fail(display = "Base64 Decode error: {}", _0)]
    Decode(#[fail(cause)] base64::DecodeError),

    #[fail(display = "{}", _0)]
    Crypto(#[fail(cause)] CryptoError),
}

/// The reason a Hawk attribute header could not be parsed.
#[derive(Fail, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[fail(display = "Header does not use the Hawk scheme")]
    BadScheme,
    #[fail(display = "Malformed attribute list")]
    Malformed,
    #[fail(display = "Unknown attribute `{}`", _0)]
    UnknownAttribute(String),
    #[fail(display = "Duplicate attribute `{}`", _0)]
    DuplicateAttribute(String),
    #[fail(display = "Bad value for attribute `{}`", _0)]
    BadValue(String),
    #[fail(display = "Missing `{}` attribute in Hawk header", _0)]
    MissingAttribute(String),
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Error::Crypto(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::HeaderParse(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}
