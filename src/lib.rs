/*!
reqwest-oauth1-consumer: an OAuth 1.0a consumer on top of blocking reqwest.

# Overview

This library obtains request/access tokens from a service provider and signs
outgoing requests (HMAC-SHA1 or PLAINTEXT) so the provider can verify them
without the consumer secret ever travelling over the wire.

The OAuth parameters are sent along with the request parameters: in a
`application/x-www-form-urlencoded` body for verbs that permit one
(`POST`, `PUT`, ...), in the query string otherwise (`GET`, `DELETE`, ...).

# How to use

## Three-legged token exchange

```no_run
use reqwest_oauth1_consumer::{Consumer, HmacSha1, NO_PARAMETERS};

# fn main() -> reqwest_oauth1_consumer::Result<()> {
let mut consumer = Consumer::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .with_signature_method(HmacSha1);

// step 1: acquire request token & token secret
let request_token = consumer.get_token(
    "https://api.example.com/oauth/request_token",
    &[("oauth_callback", "oob")],
)?;

// step 2: let the user authorize `request_token.token()` and read the pin
let pin = "[PIN]";

// step 3: acquire access token, signed with the request token
consumer.set_token(Some(request_token));
let access_token = consumer.get_token(
    "https://api.example.com/oauth/access_token",
    &[("oauth_verifier", pin)],
)?;
println!("other attributes: {:#?}", access_token.extras());

// step 4: call resources with the access token
consumer.set_token(Some(access_token));
let resp = consumer.get("https://api.example.com/1.1/statuses/home_timeline.json", NO_PARAMETERS)?;
println!("{}", resp.status());
# Ok(())
# }
```
*/
mod consumer;
mod encoding;
mod error;
pub mod signature_method;
mod signer;
mod token;
mod verb;

// exposed to external program
pub use consumer::Consumer;
pub use encoding::{escape, escape_and_join, Joinable};
pub use error::{Error, Result, TokenReaderError, TokenReaderResult};
pub use signature_method::{HmacSha1, PlainText, SignatureMethod};
pub use signer::{to_parameters, OAuthParameters, Parameters, Signed, Signer};
pub use token::{Token, TokenReader};
pub use verb::{normalize_method_name, Verb, VerbSpec, VERBS};

/// Empty request parameters.
pub const NO_PARAMETERS: &[(&str, &str)] = &[];

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_VERSION: &str = "1.0";
