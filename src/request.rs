use crate::artifacts::{ArtifactBuilder, Artifacts};
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::Header;
use crate::mac::{Mac, MacType};
use crate::options::Options;
use crate::transport::OutgoingRequest;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// A Hawk client: credentials plus the default options applied to every request.
///
/// A `Client` can be shared freely.  Each call to `sign` returns a fresh `SigningContext`
/// holding the state needed to verify the response to that one request.
#[derive(Debug)]
pub struct Client {
    credentials: Credentials,
    options: Options,
}

impl Client {
    pub fn new(credentials: Credentials, options: Options) -> Self {
        Client {
            credentials,
            options,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Sign `request` using the client's options, setting its `Authorization` header.
    ///
    /// A request that already carries an `Authorization` header is rejected with
    /// `Error::AuthorizationPresent`.
    pub fn sign<R>(&self, request: &mut R) -> Result<SigningContext<'_>>
    where
        R: OutgoingRequest,
    {
        self.sign_with(request, self.options.clone())
    }

    /// Like `sign`, but with options for this request only.
    pub fn sign_with<R>(&self, request: &mut R, options: Options) -> Result<SigningContext<'_>>
    where
        R: OutgoingRequest,
    {
        self.sign_with_rng(request, options, &mut OsRng)
    }

    /// Like `sign_with`, drawing any generated nonce from `rng`.
    pub fn sign_with_rng<R, G>(
        &self,
        request: &mut R,
        options: Options,
        rng: &mut G,
    ) -> Result<SigningContext<'_>>
    where
        R: OutgoingRequest,
        G: RngCore + CryptoRng,
    {
        if request.authorization().is_some() {
            return Err(Error::AuthorizationPresent);
        }

        let resource = request.resource();
        let artifacts = ArtifactBuilder::new(
            request.method(),
            &resource,
            request.host().ok_or(Error::MissingHost)?,
            request.scheme(),
        )
        .port(request.port())
        .build_with_rng(&options, self.credentials.key.algorithm(), rng)?;

        let mac = Mac::new(MacType::Header, &self.credentials.key, &artifacts)?;
        let header = Header::new(self.credentials.id.as_str(), &artifacts, mac);
        debug!(
            "signed {} {} for id {} (ts {}, nonce {})",
            artifacts.method,
            artifacts.resource,
            self.credentials.id,
            artifacts.ts_secs(),
            artifacts.nonce
        );
        request.set_authorization(header.to_string());

        Ok(SigningContext {
            credentials: &self.credentials,
            options,
            artifacts,
            header,
        })
    }
}

/// The state of one signed request, needed to verify the server's response to it.
///
/// A context is created by `Client::sign` and belongs to exactly one request/response pair;
/// it is deliberately not `Clone`.
#[derive(Debug)]
pub struct SigningContext<'a> {
    pub(crate) credentials: &'a Credentials,
    pub(crate) options: Options,
    pub(crate) artifacts: Artifacts,
    header: Header,
}

impl<'a> SigningContext<'a> {
    /// The facts that were signed.
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// The `Authorization` header that was attached to the request.
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[cfg(all(test, feature = "use_ring"))]
mod test {
    use super::*;
    use crate::transport::UrlRequest;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, UNIX_EPOCH};

    fn client(options: Options) -> Client {
        let credentials = Credentials::new(
            "dh37fgj492je",
            "werxhqb98rpaxn39848xrunpaw3489ruxnpaw3489ruxnpaw3489",
            "sha256",
        )
        .unwrap();
        Client::new(credentials, options)
    }

    fn fixed() -> Options {
        Options::new()
            .timestamp(UNIX_EPOCH + Duration::from_secs(1353832234))
            .nonce("dj83hs9djc")
    }

    #[test]
    fn test_sign_sets_header() {
        let client = client(fixed());
        let mut req = UrlRequest::parse("POST", "http://example.com:8000/resource?a=1&b=2").unwrap();
        let ctx = client.sign(&mut req).unwrap();
        assert_eq!(
            req.authorization(),
            Some(
                "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"dj83hs9djc\", \
                 mac=\"WpgGPpiz5a6n5c7R98wUzWbvgklqWnyIPaI783FD4Ug=\""
            )
        );
        assert_eq!(ctx.artifacts().port, 8000);
        assert_eq!(ctx.header().to_string(), req.authorization().unwrap());
    }

    #[test]
    fn test_sign_with_ext_app() {
        let client = client(fixed().ext("some-app-ext-data"));
        let mut req = UrlRequest::parse("POST", "http://example.com:8000/resource?a=1&b=2").unwrap();
        client.sign(&mut req).unwrap();
        assert_eq!(
            req.authorization(),
            Some(
                "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"dj83hs9djc\", \
                 ext=\"some-app-ext-data\", mac=\"BQdMHSu9+cPEunxOPmgSC7Mq3xTFWdnh64J7njjhPJs=\""
            )
        );

        let mut req = UrlRequest::parse("POST", "http://example.com:8000/resource?a=1&b=2").unwrap();
        client
            .sign_with(&mut req, fixed().app("my-app").dlg("my-authority"))
            .unwrap();
        assert_eq!(
            req.authorization(),
            Some(
                "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"dj83hs9djc\", \
                 mac=\"MnzhSg67U/YBHc4ezDXGIsSvc12744viFji9Qf5NjY4=\", app=\"my-app\", \
                 dlg=\"my-authority\""
            )
        );
    }

    #[test]
    fn test_sign_refuses_existing_authorization() {
        let client = client(Options::new());
        let mut req = UrlRequest::parse("GET", "https://example.com/").unwrap();
        req.set_authorization("Bearer xyz".to_string());
        match client.sign(&mut req) {
            Err(Error::AuthorizationPresent) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(req.authorization(), Some("Bearer xyz"));
    }

    #[test]
    fn test_sign_missing_host() {
        let client = client(Options::new());
        let mut req = UrlRequest::parse("GET", "data:text/plain,hello").unwrap();
        match client.sign(&mut req) {
            Err(Error::MissingHost) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sign_with_rng() {
        let client = client(Options::new());
        let mut req1 = UrlRequest::parse("GET", "https://example.com/").unwrap();
        let mut req2 = req1.clone();
        let ctx1 = client
            .sign_with_rng(&mut req1, Options::new(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        let ctx2 = client
            .sign_with_rng(&mut req2, Options::new(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(ctx1.artifacts().nonce, ctx2.artifacts().nonce);
        assert_eq!(ctx1.artifacts().port, 443);
    }

    #[test]
    fn test_header_parses_back() {
        let client = client(fixed().ext("a \"quoted\" ext").hash("AQIDBA=="));
        let mut req = UrlRequest::parse("PUT", "https://example.com/x").unwrap();
        let ctx = client.sign(&mut req).unwrap();
        let parsed: Header = req.authorization().unwrap().parse().unwrap();
        assert_eq!(&parsed, ctx.header());
        assert_eq!(parsed.ext.as_deref(), Some("a \"quoted\" ext"));
    }
}
