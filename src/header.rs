use crate::artifacts::Artifacts;
use crate::credentials::Key;
use crate::error::*;
use crate::mac::{Mac, MacType};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Attributes that may appear in a request `Authorization` header.
pub const REQUEST_ATTRIBUTES: &[&str] = &["id", "ts", "nonce", "hash", "ext", "mac", "app", "dlg"];

/// Attributes that may appear in a `WWW-Authenticate` header.
pub const WWW_AUTHENTICATE_ATTRIBUTES: &[&str] = &["ts", "tsm", "error"];

/// Attributes that may appear in a `Server-Authorization` header.
pub const SERVER_AUTHORIZATION_ATTRIBUTES: &[&str] = &["mac", "ext", "hash"];

const SCHEME_PREFIX: &str = "Hawk ";
const SEPARATOR: &str = ", ";

/// Attribute name/value pairs from a Hawk header, in the order they appeared.
/// Values are already unquoted and unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthAttributes(Vec<(String, String)>);

impl AuthAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a Hawk header value (`Hawk key="value", ...`) into its attributes.
///
/// Every attribute name must be in `allowed` and may appear only once.  Values must be
/// non-empty and consist of printable ASCII other than `"` and `\`; inside a quoted value
/// the escapes `\\` and `\"` are accepted and decoded.
///
/// ```
/// use hawk_sign::{parse_attributes, ParseError, SERVER_AUTHORIZATION_ATTRIBUTES};
/// let attrs = parse_attributes(r#"Hawk mac="abc=", ext="x""#, SERVER_AUTHORIZATION_ATTRIBUTES).unwrap();
/// assert_eq!(attrs.get("mac"), Some("abc="));
/// assert_eq!(
///     parse_attributes(r#"Hawk mac="a", mac="b""#, SERVER_AUTHORIZATION_ATTRIBUTES),
///     Err(ParseError::DuplicateAttribute("mac".to_string())),
/// );
/// ```
pub fn parse_attributes(
    value: &str,
    allowed: &[&str],
) -> std::result::Result<AuthAttributes, ParseError> {
    if !value.starts_with(SCHEME_PREFIX) {
        return Err(ParseError::BadScheme);
    }
    let mut rest = &value[SCHEME_PREFIX.len()..];
    let mut attributes = AuthAttributes::default();

    loop {
        let eq = rest.find('=').ok_or(ParseError::Malformed)?;
        let key = &rest[..eq];
        if !allowed.contains(&key) {
            return Err(ParseError::UnknownAttribute(key.to_string()));
        }
        if attributes.contains(key) {
            return Err(ParseError::DuplicateAttribute(key.to_string()));
        }

        rest = &rest[eq + 1..];
        let (raw, remainder) = if rest.starts_with('"') {
            split_quoted(&rest[1..]).ok_or(ParseError::Malformed)?
        } else {
            match rest.find(SEPARATOR) {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            }
        };

        let value = unescape(raw).ok_or_else(|| ParseError::BadValue(key.to_string()))?;
        attributes.0.push((key.to_string(), value));

        if remainder.is_empty() {
            break;
        }
        if !remainder.starts_with(SEPARATOR) {
            return Err(ParseError::Malformed);
        }
        rest = &remainder[SEPARATOR.len()..];
    }

    Ok(attributes)
}

/// Split the body of a quoted string (after the opening quote) into its raw contents and
/// whatever follows the closing quote.  Escaped quotes do not close the string.
fn split_quoted(s: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

fn is_value_char(c: char) -> bool {
    c == ' ' || c == '_' || c.is_ascii_alphanumeric() || "!#$%&'()*+,-./:;<=>?@[]^`{|}~".contains(c)
}

fn unescape(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e) if e == '\\' || e == '"' => value.push(e),
                _ => return None,
            },
            c if is_value_char(c) => value.push(c),
            _ => return None,
        }
    }
    Some(value)
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Representation of a Hawk `Authorization` header value.
///
/// The `Display` form is the complete header value, including the `Hawk ` scheme prefix, with
/// attributes in the order other Hawk implementations emit them.
#[derive(Clone, PartialEq, Debug)]
pub struct Header {
    pub id: String,
    pub ts: SystemTime,
    pub nonce: String,
    pub mac: Mac,
    pub hash: Option<String>,
    pub ext: Option<String>,
    pub app: Option<String>,
    pub dlg: Option<String>,
}

impl Header {
    /// Create a header for a request described by `artifacts`, signed with `mac`.
    pub fn new<S: Into<String>>(id: S, artifacts: &Artifacts, mac: Mac) -> Header {
        Header {
            id: id.into(),
            ts: artifacts.ts,
            nonce: artifacts.nonce.clone(),
            mac,
            hash: artifacts.hash.clone(),
            ext: artifacts.ext.clone(),
            app: artifacts.app.clone(),
            dlg: artifacts.dlg.clone(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}id=\"{}\", ts=\"{}\", nonce=\"{}\",",
            SCHEME_PREFIX,
            self.id,
            self.ts
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            self.nonce
        )?;
        if let Some(ref hash) = self.hash {
            write!(f, " hash=\"{}\",", hash)?;
        }
        if let Some(ref ext) = self.ext {
            write!(f, " ext=\"{}\",", escape(ext))?;
        }
        write!(f, " mac=\"{}\"", self.mac.to_base64())?;
        if let Some(ref app) = self.app {
            write!(f, ", app=\"{}\"", app)?;
            if let Some(ref dlg) = self.dlg {
                write!(f, ", dlg=\"{}\"", dlg)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Header {
    type Err = Error;
    fn from_str(s: &str) -> Result<Header> {
        let attributes = parse_attributes(s, REQUEST_ATTRIBUTES)?;
        let required = |name: &str| {
            attributes
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| ParseError::MissingAttribute(name.to_string()))
        };

        let ts = required("ts")?
            .parse::<u64>()
            .ok()
            .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs)))
            .ok_or_else(|| ParseError::BadValue("ts".to_string()))?;

        Ok(Header {
            id: required("id")?,
            ts,
            nonce: required("nonce")?,
            mac: Mac::from_base64(&required("mac")?)?,
            hash: attributes.get("hash").map(str::to_string),
            ext: attributes.get("ext").map(str::to_string),
            app: attributes.get("app").map(str::to_string),
            dlg: attributes.get("dlg").map(str::to_string),
        })
    }
}

/// A `Server-Authorization` header value, as a Hawk server produces it for a response.
#[derive(Clone, PartialEq, Debug)]
pub struct ServerAuthorization {
    pub mac: Mac,
    pub hash: Option<String>,
    pub ext: Option<String>,
}

impl ServerAuthorization {
    /// Sign a response to the request described by `request`, using the response's own
    /// payload `hash` and `ext` in place of the request's.
    pub fn sign(
        key: &Key,
        request: &Artifacts,
        hash: Option<&str>,
        ext: Option<&str>,
    ) -> Result<ServerAuthorization> {
        let mut artifacts = request.clone();
        artifacts.hash = hash.map(str::to_string);
        artifacts.ext = ext.map(str::to_string);
        Ok(ServerAuthorization {
            mac: Mac::new(MacType::Response, key, &artifacts)?,
            hash: artifacts.hash,
            ext: artifacts.ext,
        })
    }
}

impl fmt::Display for ServerAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}mac=\"{}\"", SCHEME_PREFIX, self.mac.to_base64())?;
        if let Some(ref hash) = self.hash {
            write!(f, ", hash=\"{}\"", hash)?;
        }
        if let Some(ref ext) = self.ext {
            write!(f, ", ext=\"{}\"", escape(ext))?;
        }
        Ok(())
    }
}
