//! Typed view of a knowledge base's vector-store connection settings

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::vector_store::Protocol;

/// A port as stored by the catalog: either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Float(f64),
    Text(String),
}

impl PortValue {
    /// Interpret the value as a TCP port, if it is one
    pub fn as_port(&self) -> Option<u16> {
        match self {
            Self::Number(n) => u16::try_from(*n).ok(),
            Self::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u16::MAX as f64 => {
                Some(*f as u16)
            }
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Vector database connection config of a knowledge base
///
/// Every field is optional; whatever is left unset falls back to the
/// service-wide defaults during endpoint resolution. Keys this service does not
/// interpret are kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorDbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_protocol",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol: Option<Protocol>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VectorDbConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: PortValue) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Connection URL, ignoring blank values
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// Discrete host, ignoring blank values
    pub fn host(&self) -> Option<&str> {
        non_blank(self.host.as_deref())
    }

    /// API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Case-insensitive protocol; anything unrecognized is dropped with a warning
/// so one bad record never fails the whole catalog.
fn lenient_protocol<'de, D>(deserializer: D) -> Result<Option<Protocol>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let protocol = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.parse::<Protocol>() {
            Ok(protocol) => Some(protocol),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid vector store protocol");
                None
            }
        },
        Some(other) => {
            tracing::warn!(protocol = %other, "Ignoring invalid vector store protocol");
            None
        }
    };
    Ok(protocol)
}
