use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token endpoint answered with status {status} : {body}")]
    InvalidTokenResponse { status: u16, body: String },
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("unsupported HTTP verb : {0}")]
    UnsupportedVerb(String),
    #[error("unsupported signature method : {0}")]
    UnsupportedSignatureMethod(String),
    #[error("request parameters could not be serialized : {0}")]
    Parameters(#[from] serde_urlencoded::ser::Error),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("response has malformed format: {0} is empty in {1}")]
    EmptyTokenValue(&'static str, String),
}
