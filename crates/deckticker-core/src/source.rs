use std::fmt::{Display, Formatter};

use log::warn;
use serde::{Deserialize, Serialize};

/// Identifier for a configured quote source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    AlphaVantage,
    Finnhub,
}

impl SourceKind {
    /// Resolve a source from a settings value. Unrecognized values fall back
    /// to Yahoo rather than failing the instance.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "yahoo" => Self::Yahoo,
            "alphavantage" => Self::AlphaVantage,
            "finnhub" => Self::Finnhub,
            other => {
                warn!("unknown data source '{other}', falling back to yahoo");
                Self::Yahoo
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::AlphaVantage => "alphavantage",
            Self::Finnhub => "finnhub",
        }
    }

    /// Yahoo's chart endpoint is unauthenticated; the other two take a
    /// query-string credential.
    pub const fn requires_credential(self) -> bool {
        !matches!(self, Self::Yahoo)
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for SourceKind {}
