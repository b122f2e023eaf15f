use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::encoding::escape_and_join;
use crate::verb::normalize_method_name;
use crate::{Result, SignatureMethod, Token};
use crate::{
    OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERSION, OAUTH_VERSION_KEY,
};

/// Ordered `key => value` list. Inserting an existing key replaces its value
/// in place.
pub type Parameters = Vec<(String, String)>;

/// Overrides for the per-request `oauth_nonce` and `oauth_timestamp`.
///
/// Unset values are generated freshly for every request, which is what
/// providers expect; fixing them is only useful to reproduce test vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthParameters<'a> {
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }
}

/// Computes `oauth_signature` for one request.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSignatureMethod>
where
    TSignatureMethod: SignatureMethod,
{
    consumer_key: &'a str,
    consumer_secret: &'a str,
    token: Option<&'a Token>,
    signature_method: &'a TSignatureMethod,
    parameters: OAuthParameters<'a>,
}

/// Result of signing: the OAuth parameter set, `oauth_signature` last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed {
    oauth_parameters: Parameters,
    base_string: String,
}

impl<'a, TSignatureMethod> Signer<'a, TSignatureMethod>
where
    TSignatureMethod: SignatureMethod,
{
    pub fn new(
        consumer_key: &'a str,
        consumer_secret: &'a str,
        token: Option<&'a Token>,
        signature_method: &'a TSignatureMethod,
        parameters: OAuthParameters<'a>,
    ) -> Self {
        Signer {
            consumer_key,
            consumer_secret,
            token,
            signature_method,
            parameters,
        }
    }

    /// The unsigned OAuth parameter set, in protocol order.
    pub fn oauth_parameters(&self) -> Parameters {
        let nonce = match self.parameters.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        };
        let timestamp = self.parameters.timestamp.unwrap_or_else(now);

        let mut params = vec![
            (OAUTH_VERSION_KEY.to_string(), OAUTH_VERSION.to_string()),
            (OAUTH_NONCE_KEY.to_string(), nonce),
            (OAUTH_TIMESTAMP_KEY.to_string(), timestamp.to_string()),
            (OAUTH_CONSUMER_KEY.to_string(), self.consumer_key.to_string()),
            (
                OAUTH_SIGNATURE_METHOD_KEY.to_string(),
                self.signature_method.name().to_string(),
            ),
        ];
        if let Some(token) = self.token {
            params.push((OAUTH_TOKEN_KEY.to_string(), token.token().to_string()));
        }
        params
    }

    /// `escape(consumer_secret)&escape(token_secret)`; the token part is empty
    /// while no token is bound.
    pub fn signing_key(&self) -> String {
        let token_secret = self.token.map(Token::secret).unwrap_or_default();
        escape_and_join(vec![self.consumer_secret, token_secret])
    }

    /// `escape(METHOD)&escape(url)&escape(sorted parameters)`.
    ///
    /// Request parameters override OAuth parameters of the same name, and
    /// the merged set is sorted by key bytes before encoding.
    pub fn signature_base_string(
        &self,
        method: &str,
        url: &str,
        oauth_parameters: &[(String, String)],
        parameters: &[(String, String)],
    ) -> String {
        let merged = merge(oauth_parameters, parameters);
        let sorted: BTreeMap<&str, &str> = merged
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let data = escape_and_join(sorted);
        escape_and_join(vec![normalize_method_name(method), url.to_string(), data])
    }

    /// Build the OAuth parameter set and append `oauth_signature` to it.
    pub fn sign(self, method: &str, url: &str, parameters: &[(String, String)]) -> Signed {
        let mut oauth_parameters = self.oauth_parameters();
        let base_string = self.signature_base_string(method, url, &oauth_parameters, parameters);
        tracing::trace!(%base_string, "signature base string");
        let signature = self
            .signature_method
            .digest(&self.signing_key(), &base_string);
        oauth_parameters.push((OAUTH_SIGNATURE_KEY.to_string(), signature));
        Signed {
            oauth_parameters,
            base_string,
        }
    }
}

impl Signed {
    pub fn oauth_parameters(&self) -> &[(String, String)] {
        &self.oauth_parameters
    }

    pub fn base_string(&self) -> &str {
        &self.base_string
    }

    pub fn signature(&self) -> &str {
        self.oauth_parameters
            .iter()
            .rev()
            .find(|(k, _)| k == OAUTH_SIGNATURE_KEY)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// Encoded parameter string to transmit: the signed OAuth set merged with
    /// the request parameters, not re-sorted.
    pub fn encode(&self, parameters: &[(String, String)]) -> String {
        escape_and_join(merge(&self.oauth_parameters, parameters).iter())
    }
}

/// Flatten serializable request parameters into `key => value` pairs.
///
/// Accepts whatever `serde_urlencoded` does: slices of pairs, maps, flat structs.
pub fn to_parameters<T>(parameters: &T) -> Result<Parameters>
where
    T: Serialize + ?Sized,
{
    let encoded = serde_urlencoded::to_string(parameters)?;
    let pairs = url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect::<Vec<_>>();
    Ok(merge(&[], &pairs))
}

/// `base` updated with `overrides`: existing keys keep their position.
pub(crate) fn merge(base: &[(String, String)], overrides: &[(String, String)]) -> Parameters {
    let mut merged = base.to_vec();
    for (key, value) in overrides {
        match merged.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

fn now() -> u64 {
    unix_seconds(SystemTime::now())
}

fn unix_seconds(time: SystemTime) -> u64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs(),
        Err(err) => {
            tracing::warn!(
                behind = ?err.duration(),
                "system clock is before the unix epoch, sending oauth_timestamp=0"
            );
            0
        }
    }
}

/// Hex SHA-1 of the current time in nanoseconds and a random number.
fn generate_nonce() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let seed = format!("{}{}", nanos, rand::random::<u64>());
    format!("{:x}", Sha1::digest(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HmacSha1, PlainText};

    fn pairs(items: &[(&str, &str)]) -> Parameters {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn oauth_core_appendix_a() {
        // OAuth Core 1.0, Appendix A.5
        let token = Token::new("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let params = OAuthParameters::new()
            .nonce("kllo9940pd9333jh")
            .timestamp(1_191_242_096u64);
        let signer = Signer::new(
            "dpf43f3p2l4k3l03",
            "kd94hf93k423kf44",
            Some(&token),
            &HmacSha1,
            params,
        );
        assert_eq!(signer.signing_key(), "kd94hf93k423kf44&pfkkdhi9sl3r4s00");

        let signed = signer.sign(
            "GET",
            "http://photos.example.net/photos",
            &pairs(&[("file", "vacation.jpg"), ("size", "original")]),
        );
        assert_eq!(
            signed.base_string(),
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
        assert_eq!(signed.signature(), "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn twitter_signature_guide() {
        // https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature
        let token = Token::new(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = OAuthParameters::new()
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958u64);
        let signed = Signer::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            Some(&token),
            &HmacSha1,
            params,
        )
        .sign(
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &pairs(&[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ]),
        );
        assert_eq!(signed.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
        assert!(signed.base_string().starts_with(
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key"
        ));
        assert!(signed
            .base_string()
            .ends_with("%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"));
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let params = OAuthParameters::new().nonce("n").timestamp(1u64);
        let signer = Signer::new("ck", "cs", None, &HmacSha1, params);
        let oauth = signer.oauth_parameters();
        let forward = pairs(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let backward = pairs(&[("c", "3"), ("b", "2"), ("a", "1")]);

        assert_eq!(
            signer.signature_base_string("GET", "http://example.com/r", &oauth, &forward),
            signer.signature_base_string("GET", "http://example.com/r", &oauth, &backward)
        );
        assert_eq!(
            signer.clone().sign("GET", "http://example.com/r", &forward).signature(),
            signer.sign("GET", "http://example.com/r", &backward).signature()
        );
    }

    #[test]
    fn sort_is_bytewise() {
        let params = OAuthParameters::new().nonce("n").timestamp(1u64);
        let signer = Signer::new("ck", "cs", None, &PlainText, params);
        let base = signer.signature_base_string(
            "GET",
            "u",
            &[],
            &pairs(&[("b", "1"), ("a", "2"), ("B", "3"), ("a_", "4")]),
        );
        assert_eq!(base, "GET&u&B%3D3%26a%3D2%26a_%3D4%26b%3D1");
    }

    #[test]
    fn plaintext_without_token() {
        let signed = Signer::new("ck", "cs", None, &PlainText, OAuthParameters::new()).sign(
            "GET",
            "http://example.com/r",
            &[],
        );
        assert_eq!(signed.signature(), "cs%26");
    }

    #[test]
    fn oauth_parameter_set() {
        let token = Token::new("tok", "sec");
        let params = OAuthParameters::new().nonce("abc").timestamp(42u64);
        let signer = Signer::new("ck", "cs", Some(&token), &HmacSha1, params);
        assert_eq!(
            signer.oauth_parameters(),
            pairs(&[
                ("oauth_version", "1.0"),
                ("oauth_nonce", "abc"),
                ("oauth_timestamp", "42"),
                ("oauth_consumer_key", "ck"),
                ("oauth_signature_method", "HMAC-SHA1"),
                ("oauth_token", "tok"),
            ])
        );

        let signed = signer.sign("GET", "http://example.com/r", &[]);
        let (last_key, _) = signed.oauth_parameters().last().unwrap();
        assert_eq!(last_key, "oauth_signature");
        assert!(!signed.base_string().contains("oauth_signature%3D"));
    }

    #[test]
    fn fresh_nonce_and_timestamp() {
        let signer = Signer::new("ck", "cs", None, &HmacSha1, OAuthParameters::new());
        let first = signer.oauth_parameters();
        let second = signer.oauth_parameters();
        assert_ne!(first[1].1, second[1].1);
        assert_eq!(first[1].1.len(), 40);
        assert!(first[2].1.parse::<u64>().unwrap() > 1_500_000_000);
    }

    #[test]
    fn timestamp_before_epoch_is_zero() {
        use std::time::Duration;

        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_secs(1_318_622_958)), 1_318_622_958);
        assert_eq!(unix_seconds(UNIX_EPOCH), 0);
        assert_eq!(unix_seconds(UNIX_EPOCH - Duration::from_secs(60)), 0);
    }

    #[test]
    fn encode_merges_without_sorting() {
        let signed = Signer::new(
            "ck",
            "cs",
            None,
            &PlainText,
            OAuthParameters::new().nonce("n").timestamp(7u64),
        )
        .sign("GET", "http://example.com/r", &[]);
        let encoded = signed.encode(&pairs(&[("z", "a b"), ("oauth_nonce", "m")]));
        assert_eq!(
            encoded,
            "oauth_version=1.0&oauth_nonce=m&oauth_timestamp=7&oauth_consumer_key=ck&oauth_signature_method=PLAINTEXT&oauth_signature=cs%2526&z=a%20b"
        );
    }

    #[test]
    fn serializable_parameters() {
        #[derive(Serialize)]
        struct Status<'a> {
            status: &'a str,
            count: u32,
        }

        assert_eq!(
            to_parameters(&Status {
                status: "a + b",
                count: 3
            })
            .unwrap(),
            pairs(&[("status", "a + b"), ("count", "3")])
        );
        assert_eq!(
            to_parameters(&[("k", "1"), ("k", "2")]).unwrap(),
            pairs(&[("k", "2")])
        );
        assert!(to_parameters(crate::NO_PARAMETERS).unwrap().is_empty());
    }

    #[test]
    fn merge_keeps_position() {
        let merged = merge(&pairs(&[("a", "1"), ("b", "2")]), &pairs(&[("a", "3"), ("c", "4")]));
        assert_eq!(merged, pairs(&[("a", "3"), ("b", "2"), ("c", "4")]));
    }
}
