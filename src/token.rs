use std::collections::HashMap;

use reqwest::blocking::Response;

use crate::{Error, Result, TokenReaderError, TokenReaderResult};
use crate::{OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// A token/secret pair issued by the service provider, plus whatever else
/// the token endpoint returned (user id, screen name, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    token: String,
    secret: String,
    extra: HashMap<String, String>,
}

impl Token {
    pub fn new<TToken, TSecret>(token: TToken, secret: TSecret) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
    {
        Token {
            token: token.into(),
            secret: secret.into(),
            extra: HashMap::new(),
        }
    }

    /// Attach a provider-specific value.
    pub fn extra<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse the answer of a request-token or access-token endpoint.
    ///
    /// Anything but status 200 is rejected. The body is read as literal
    /// `key=value` pairs separated by `&`; no percent-decoding is applied.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTokenResponse`] for a non-200 status,
    /// [`TokenReaderError::TokenKeyNotFound`] when `oauth_token` or
    /// `oauth_token_secret` is missing, [`TokenReaderError::EmptyTokenValue`]
    /// when either is present without a value.
    pub fn from_response(status: u16, body: &str) -> Result<Token> {
        if status != 200 {
            return Err(Error::InvalidTokenResponse {
                status,
                body: body.to_string(),
            });
        }
        Ok(read_oauth_token(body.to_string())?)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Every pair of the token response other than the token and its secret.
    pub fn extras(&self) -> &HashMap<String, String> {
        &self.extra
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// Add parse_oauth_token feature to reqwest::blocking::Response.
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(self) -> Result<Token>;
}

impl TokenReader for Response {
    fn parse_oauth_token(self) -> Result<Token> {
        let status = self.status().as_u16();
        let text = self.text()?;
        Token::from_response(status, &text)
    }
}

impl<E> TokenReader for std::result::Result<Response, E>
where
    E: Into<Error>,
{
    fn parse_oauth_token(self) -> Result<Token> {
        match self {
            Ok(resp) => resp.parse_oauth_token(),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_oauth_token(text: String) -> TokenReaderResult<Token> {
    let mut destructured = text
        .split('&')
        .map(|e| e.splitn(2, '='))
        .map(|mut iter| {
            (
                iter.next().unwrap_or_default().to_string(),
                iter.next().unwrap_or_default().to_string(),
            )
        })
        .collect::<HashMap<String, String>>();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(token), _) if token.is_empty() => {
            Err(TokenReaderError::EmptyTokenValue(OAUTH_TOKEN_KEY, text))
        }
        (Some(_), Some(secret)) if secret.is_empty() => Err(TokenReaderError::EmptyTokenValue(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
        (Some(token), Some(secret)) => {
            tracing::debug!(extras = destructured.len(), "parsed oauth token response");
            Ok(Token {
                token,
                secret,
                extra: destructured,
            })
        }
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

mod private {
    use reqwest::blocking::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    impl<E> Sealed for std::result::Result<Response, E> where E: Into<Error> {}
}
