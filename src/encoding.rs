use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters that must be escaped: everything except `A-Z a-z 0-9 - . _ ~`.
///
/// Space becomes `%20` and `~` stays literal, as RFC 3986 requires.
const OAUTH_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` with uppercase hex digits.
pub fn escape(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ESCAPE_SET).to_string()
}

/// One element of an [`escape_and_join`] sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Joinable<'a> {
    /// Escaped on its own.
    Value(Cow<'a, str>),
    /// Rendered as `key=value`, both sides escaped.
    Pair(Cow<'a, str>, Cow<'a, str>),
}

impl<'a> From<&'a str> for Joinable<'a> {
    fn from(value: &'a str) -> Self {
        Joinable::Value(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Joinable<'a> {
    fn from(value: &'a String) -> Self {
        Joinable::Value(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Joinable<'_> {
    fn from(value: String) -> Self {
        Joinable::Value(Cow::Owned(value))
    }
}

impl<'a> From<(&'a str, &'a str)> for Joinable<'a> {
    fn from((key, value): (&'a str, &'a str)) -> Self {
        Joinable::Pair(Cow::Borrowed(key), Cow::Borrowed(value))
    }
}

impl<'a> From<&'a (String, String)> for Joinable<'a> {
    fn from((key, value): &'a (String, String)) -> Self {
        Joinable::Pair(Cow::Borrowed(key.as_str()), Cow::Borrowed(value.as_str()))
    }
}

impl<'a> From<(&'a String, &'a String)> for Joinable<'a> {
    fn from((key, value): (&'a String, &'a String)) -> Self {
        Joinable::Pair(Cow::Borrowed(key.as_str()), Cow::Borrowed(value.as_str()))
    }
}

/// Escape every item and join the results with `&`.
///
/// Plain values are escaped as-is; pairs become `key=value`. Order is kept,
/// so callers sort beforehand when canonical ordering matters.
pub fn escape_and_join<'a, I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<Joinable<'a>>,
{
    items
        .into_iter()
        .map(|item| match item.into() {
            Joinable::Value(value) => escape(&value),
            Joinable::Pair(key, value) => format!("{}={}", escape(&key), escape(&value)),
        })
        .collect::<Vec<_>>()
        .join("&")
}
