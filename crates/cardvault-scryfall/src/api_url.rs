//! Card API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use cardvault_core::Error;

/// A validated base URL of the card API.
///
/// Must use HTTPS; plain HTTP is accepted for loopback hosts so tests and
/// local mirrors work.
///
/// # Example
///
/// ```
/// use cardvault_scryfall::ApiUrl;
///
/// let api = ApiUrl::new("https://api.scryfall.com/").unwrap();
/// assert_eq!(api.endpoint("cards/search"), "https://api.scryfall.com/cards/search");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error for relative, non-HTTP(S) or host-less URLs.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| Error::invalid("api_url", e.to_string()))?;
        Self::validate(&url)?;
        Ok(Self(url))
    }

    /// Absolute URL of an endpoint path such as `cards/search`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url) -> Result<(), Error> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::invalid("api_url", "must have a host"))?;

        match url.scheme() {
            "https" => Ok(()),
            "http" if matches!(host, "localhost" | "127.0.0.1" | "[::1]") => Ok(()),
            "http" => Err(Error::invalid(
                "api_url",
                "plain http is only allowed for localhost",
            )),
            other => Err(Error::invalid(
                "api_url",
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
