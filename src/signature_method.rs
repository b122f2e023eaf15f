use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::encoding::escape;
use crate::{Error, Result};

/// Algorithm used to turn a signing key and a signature base string into
/// the `oauth_signature` value.
///
/// A [`Consumer`](crate::Consumer) only relies on these two operations, so a
/// new algorithm is added by implementing this trait.
pub trait SignatureMethod {
    /// Value sent as `oauth_signature_method`.
    fn name(&self) -> &str;

    /// Produce the signature for `message` under `key`.
    fn digest(&self, key: &str, message: &str) -> String;
}

impl<T> SignatureMethod for Box<T>
where
    T: SignatureMethod + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn digest(&self, key: &str, message: &str) -> String {
        (**self).digest(key, message)
    }
}

impl<T> SignatureMethod for &T
where
    T: SignatureMethod + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn digest(&self, key: &str, message: &str) -> String {
        (**self).digest(key, message)
    }
}

/// `PLAINTEXT`: the signature is the escaped signing key; the message is ignored.
///
/// Only meaningful over a secure transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainText;

impl SignatureMethod for PlainText {
    fn name(&self) -> &str {
        PLAINTEXT
    }

    fn digest(&self, key: &str, _message: &str) -> String {
        escape(key)
    }
}

/// `HMAC-SHA1`: base64 of the HMAC-SHA1 of the message keyed by the signing key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HmacSha1;

impl SignatureMethod for HmacSha1 {
    fn name(&self) -> &str {
        HMAC_SHA1
    }

    fn digest(&self, key: &str, message: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac = match Hmac::<Sha1>::new_from_slice(key.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC can take a key of any size"),
        };
        mac.update(message.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

const PLAINTEXT: &str = "PLAINTEXT";
const HMAC_SHA1: &str = "HMAC-SHA1";

/// Select a signature method by its `oauth_signature_method` name.
///
/// Matching is case-insensitive; `_` is accepted in place of `-`.
pub fn from_name(name: &str) -> Result<Box<dyn SignatureMethod + Send + Sync>> {
    let normalized = name.trim().to_ascii_uppercase().replace('_', "-");
    match normalized.as_str() {
        HMAC_SHA1 => Ok(Box::new(HmacSha1)),
        PLAINTEXT => Ok(Box::new(PlainText)),
        _ => Err(Error::UnsupportedSignatureMethod(name.to_string())),
    }
}

impl fmt::Debug for dyn SignatureMethod + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignatureMethod").field(&self.name()).finish()
    }
}
