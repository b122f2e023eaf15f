use std::fmt;

use http::header::CONTENT_TYPE;
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Serialize;

use crate::signer::to_parameters;
use crate::{
    HmacSha1, OAuthParameters, Result, SignatureMethod, Signed, Signer, Token, TokenReader, Verb,
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An application registered with a service provider.
///
/// Holds the consumer key and secret, the signature method, and the token
/// currently bound for signing. The token is rebound explicitly by the
/// caller between the request-token, access-token and resource phases.
pub struct Consumer<TSignatureMethod = HmacSha1> {
    key: String,
    secret: String,
    signature_method: TSignatureMethod,
    token: Option<Token>,
    inner: ReqwestClient,
}

impl Consumer<HmacSha1> {
    /// Constructs a new `Consumer` signing with HMAC-SHA1.
    ///
    /// This method calls reqwest::blocking::Client::new() internally.
    pub fn new<TKey, TSecret>(key: TKey, secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Consumer {
            key: key.into(),
            secret: secret.into(),
            signature_method: HmacSha1,
            token: None,
            inner: ReqwestClient::new(),
        }
    }
}

impl<TSignatureMethod> Consumer<TSignatureMethod>
where
    TSignatureMethod: SignatureMethod,
{
    /// Replace the signature method.
    pub fn with_signature_method<T>(self, signature_method: T) -> Consumer<T>
    where
        T: SignatureMethod,
    {
        Consumer {
            key: self.key,
            secret: self.secret,
            signature_method,
            token: self.token,
            inner: self.inner,
        }
    }

    /// Bind `token` for subsequent requests.
    pub fn with_token(self, token: Token) -> Self {
        Consumer {
            token: Some(token),
            ..self
        }
    }

    /// Replace the inner `reqwest::blocking::Client`.
    pub fn with_client(self, client: ReqwestClient) -> Self {
        Consumer {
            inner: client,
            ..self
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn signature_method(&self) -> &TSignatureMethod {
        &self.signature_method
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Rebind (or unbind) the token used for signing.
    pub fn set_token(&mut self, token: Option<Token>) {
        self.token = token;
    }

    // ------------------------------------------------------------------------
    // Token exchange

    /// Signed `POST` to a request-token or access-token endpoint.
    ///
    /// The bound token is left untouched; rebind it with the returned token
    /// before the next phase.
    ///
    /// # Errors
    ///
    /// See [`Token::from_response`]; transport failures are returned as
    /// [`Error::Reqwest`](crate::Error::Reqwest).
    pub fn get_token<T>(&self, url: &str, parameters: &T) -> Result<Token>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Post, url, parameters).parse_oauth_token()
    }

    // ------------------------------------------------------------------------
    // Signing

    /// Sign a request with a fresh nonce and the current time.
    pub fn sign<T>(&self, verb: Verb, url: &str, parameters: &T) -> Result<Signed>
    where
        T: Serialize + ?Sized,
    {
        self.sign_with_params(verb, url, parameters, OAuthParameters::new())
    }

    /// Sign a request with the given nonce/timestamp overrides.
    pub fn sign_with_params<T>(
        &self,
        verb: Verb,
        url: &str,
        parameters: &T,
        oauth_parameters: OAuthParameters<'_>,
    ) -> Result<Signed>
    where
        T: Serialize + ?Sized,
    {
        let parameters = to_parameters(parameters)?;
        Ok(self.signer(oauth_parameters).sign(verb.as_str(), url, &parameters))
    }

    fn signer<'a>(&'a self, parameters: OAuthParameters<'a>) -> Signer<'a, TSignatureMethod> {
        Signer::new(
            &self.key,
            &self.secret,
            self.token.as_ref(),
            &self.signature_method,
            parameters,
        )
    }

    // ------------------------------------------------------------------------
    // Dispatch

    /// Sign and prepare a request without sending it.
    ///
    /// Verbs that permit a body carry the parameters as a form body; the
    /// others append them to the URL as a query string.
    ///
    /// `url` is signed and targeted as given, query string included. Pass
    /// query parameters through `parameters` instead, or the provider cannot
    /// verify the signature.
    pub fn build_request<T>(&self, verb: Verb, url: &str, parameters: &T) -> Result<RequestBuilder>
    where
        T: Serialize + ?Sized,
    {
        self.build_request_with_params(verb, url, parameters, OAuthParameters::new())
    }

    /// Same as [`build_request`](Self::build_request) with nonce/timestamp overrides.
    pub fn build_request_with_params<T>(
        &self,
        verb: Verb,
        url: &str,
        parameters: &T,
        oauth_parameters: OAuthParameters<'_>,
    ) -> Result<RequestBuilder>
    where
        T: Serialize + ?Sized,
    {
        let parameters = to_parameters(parameters)?;
        let signed = self
            .signer(oauth_parameters)
            .sign(verb.as_str(), url, &parameters);
        let data = signed.encode(&parameters);

        let builder = if verb.permits_body() {
            tracing::debug!(method = verb.as_str(), url, "dispatching signed form body");
            self.inner
                .request(verb.method(), url)
                .header(CONTENT_TYPE, FORM_URLENCODED)
                .body(data)
        } else {
            tracing::debug!(method = verb.as_str(), url, "dispatching signed query");
            let separator = if url.contains('?') { '&' } else { '?' };
            self.inner
                .request(verb.method(), format!("{}{}{}", url, separator, data))
        };
        Ok(builder)
    }

    /// Sign and send a request, returning the raw response.
    ///
    /// # Errors
    ///
    /// This method fails if the parameters cannot be serialized into
    /// key/value pairs or if there was an error while sending the request.
    pub fn request<T>(&self, verb: Verb, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.build_request(verb, url, parameters)?.send()?)
    }

    /// [`request`](Self::request) with the verb given by name (`"get"`, `"POST"`, ...).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedVerb`](crate::Error::UnsupportedVerb) for a name
    /// outside [`VERBS`](crate::VERBS).
    pub fn request_named<T>(&self, method: &str, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(method.parse()?, url, parameters)
    }

    /// Convenience method to make a signed `GET` request.
    pub fn get<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Get, url, parameters)
    }

    /// Convenience method to make a signed `HEAD` request.
    pub fn head<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Head, url, parameters)
    }

    /// Convenience method to make a signed `POST` request.
    pub fn post<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Post, url, parameters)
    }

    /// Convenience method to make a signed `PUT` request.
    pub fn put<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Put, url, parameters)
    }

    /// Convenience method to make a signed `PATCH` request.
    pub fn patch<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Patch, url, parameters)
    }

    /// Convenience method to make a signed `DELETE` request.
    pub fn delete<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Delete, url, parameters)
    }

    /// Convenience method to make a signed `OPTIONS` request.
    pub fn options<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Options, url, parameters)
    }

    /// Convenience method to make a signed `TRACE` request.
    pub fn trace<T>(&self, url: &str, parameters: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.request(Verb::Trace, url, parameters)
    }
}

impl<TSignatureMethod> fmt::Debug for Consumer<TSignatureMethod>
where
    TSignatureMethod: SignatureMethod,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("signature_method", &self.signature_method.name())
            .field("token", &self.token.as_ref().map(Token::token))
            .finish()
    }
}
