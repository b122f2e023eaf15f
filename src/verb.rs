use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::Error;

/// HTTP verbs a [`Consumer`](crate::Consumer) can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Trace,
    Patch,
    Propfind,
    Proppatch,
    Mkcol,
    Copy,
    Move,
    Lock,
    Unlock,
}

/// Dispatch properties of a verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbSpec {
    /// Name on the wire and in the signature base string.
    pub wire_name: &'static str,
    /// Parameters travel in a form body when set, in the query string otherwise.
    pub permits_body: bool,
}

const fn spec(wire_name: &'static str, permits_body: bool) -> VerbSpec {
    VerbSpec {
        wire_name,
        permits_body,
    }
}

/// Every supported verb with its dispatch properties.
pub const VERBS: [(Verb, VerbSpec); 15] = [
    (Verb::Get, spec("GET", false)),
    (Verb::Head, spec("HEAD", false)),
    (Verb::Post, spec("POST", true)),
    (Verb::Put, spec("PUT", true)),
    (Verb::Delete, spec("DELETE", false)),
    (Verb::Options, spec("OPTIONS", false)),
    (Verb::Trace, spec("TRACE", false)),
    (Verb::Patch, spec("PATCH", true)),
    (Verb::Propfind, spec("PROPFIND", true)),
    (Verb::Proppatch, spec("PROPPATCH", true)),
    (Verb::Mkcol, spec("MKCOL", true)),
    (Verb::Copy, spec("COPY", false)),
    (Verb::Move, spec("MOVE", false)),
    (Verb::Lock, spec("LOCK", true)),
    (Verb::Unlock, spec("UNLOCK", true)),
];

impl Verb {
    pub fn spec(self) -> VerbSpec {
        match VERBS.iter().find(|(verb, _)| *verb == self) {
            Some((_, spec)) => *spec,
            None => unreachable!("every verb has a table entry"),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.spec().wire_name
    }

    pub fn permits_body(self) -> bool {
        self.spec().permits_body
    }

    pub(crate) fn method(self) -> Method {
        match Method::from_bytes(self.as_str().as_bytes()) {
            Ok(method) => method,
            Err(_) => unreachable!("wire names are valid tokens"),
        }
    }
}

/// Uppercase `name` and turn `_` into `-`, the form a method takes in the
/// signature base string.
pub fn normalize_method_name(name: &str) -> String {
    name.to_ascii_uppercase().replace('_', "-")
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_method_name(name.trim());
        VERBS
            .iter()
            .find(|(_, spec)| spec.wire_name == normalized)
            .map(|(verb, _)| *verb)
            .ok_or_else(|| Error::UnsupportedVerb(name.to_string()))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
