//! The server-publish backend family discriminator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The mutually exclusive backend families for the `server_publish#`
/// scheme. Exactly one family is active per process; it is chosen from
/// configuration and injected into the dispatcher at construction, never
/// read from ambient global state inside dispatch logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    /// A well-known endpoint served from inside the process.
    Embedded,
    /// A standalone relay daemon the process registers with.
    Relay,
}

impl BackendFamily {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendFamily::Embedded => "embedded",
            BackendFamily::Relay => "relay",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an unrecognized backend-family discriminator value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend family '{0}'")]
pub struct UnknownFamily(pub String);

impl FromStr for BackendFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(BackendFamily::Embedded),
            "relay" => Ok(BackendFamily::Relay),
            other => Err(UnknownFamily(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_roundtrip() {
        for family in [BackendFamily::Embedded, BackendFamily::Relay] {
            assert_eq!(family.as_str().parse::<BackendFamily>().unwrap(), family);
        }
    }

    #[test]
    fn unknown_discriminator_is_an_error() {
        let err = "orbix".parse::<BackendFamily>().unwrap_err();
        assert!(err.to_string().contains("orbix"));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&BackendFamily::Relay).unwrap();
        assert_eq!(json, "\"relay\"");
        let back: BackendFamily = serde_json::from_str("\"embedded\"").unwrap();
        assert_eq!(back, BackendFamily::Embedded);
    }
}
