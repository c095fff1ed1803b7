//! Vector store endpoint resolution
//!
//! Every search resolves its own endpoint from the knowledge base's
//! `vector_db_config`, falling back to service-wide defaults field by field.
//!
//! Precedence:
//! 1. `url` (host from the URL; explicit port if present, else the protocol's
//!    canonical port)
//! 2. discrete `host` / `port`
//! 3. service defaults
//!
//! After resolution the port is normalized to the selected protocol: the
//! well-known text port is never used for a binary connection and vice versa.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::{PortValue, VectorDbConfig};

/// Well-known port of the text (HTTP/JSON) protocol
pub const TEXT_PROTOCOL_PORT: u16 = 6333;

/// Well-known port of the binary (gRPC) protocol
pub const BINARY_PROTOCOL_PORT: u16 = 6334;

/// Wire protocol used to talk to the vector store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Grpc,
    Http,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grpc => "grpc",
            Self::Http => "http",
        }
    }

    /// The port this protocol is served on by default
    pub fn canonical_port(&self) -> u16 {
        match self {
            Self::Grpc => BINARY_PROTOCOL_PORT,
            Self::Http => TEXT_PROTOCOL_PORT,
        }
    }

    fn normalize_port(&self, port: u16) -> u16 {
        match (self, port) {
            (Self::Grpc, TEXT_PROTOCOL_PORT) => BINARY_PROTOCOL_PORT,
            (Self::Http, BINARY_PROTOCOL_PORT) => TEXT_PROTOCOL_PORT,
            _ => port,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grpc" => Ok(Self::Grpc),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown vector store protocol: {}", other)),
        }
    }
}

/// Service-wide fallbacks for endpoint resolution
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDefaults {
    pub host: String,
    pub http_port: u16,
    pub grpc_port: u16,
    pub api_key: Option<String>,
    pub protocol: Protocol,
}

impl EndpointDefaults {
    pub fn port_for(&self, protocol: Protocol) -> u16 {
        match protocol {
            Protocol::Grpc => self.grpc_port,
            Protocol::Http => self.http_port,
        }
    }
}

impl Default for EndpointDefaults {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            http_port: TEXT_PROTOCOL_PORT,
            grpc_port: BINARY_PROTOCOL_PORT,
            api_key: None,
            protocol: Protocol::default(),
        }
    }
}

/// Fully resolved connection parameters for one search
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub protocol: Protocol,
    /// Set when the catalog URL uses `https`
    pub tls: bool,
}

impl ConnectionTarget {
    /// Connection-cache key
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for either transport
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("has_api_key", &self.api_key.is_some())
            .field("protocol", &self.protocol)
            .field("tls", &self.tls)
            .finish()
    }
}

/// Resolve the connection target for a knowledge base
pub fn resolve_target(
    config: Option<&VectorDbConfig>,
    defaults: &EndpointDefaults,
) -> ConnectionTarget {
    let protocol = config
        .and_then(|c| c.protocol)
        .unwrap_or(defaults.protocol);

    let (host, port, tls) = match config {
        Some(config) => match config.url() {
            Some(url) => endpoint_from_url(url, protocol),
            None => (
                config.host().map(str::to_string),
                config.port.as_ref().and_then(port_from_value),
                false,
            ),
        },
        None => (None, None, false),
    };

    let host = host.unwrap_or_else(|| defaults.host.clone());
    let port = protocol.normalize_port(port.unwrap_or_else(|| defaults.port_for(protocol)));

    let api_key = config
        .and_then(|c| c.api_key())
        .map(str::to_string)
        .or_else(|| defaults.api_key.clone().filter(|k| !k.is_empty()));

    ConnectionTarget {
        host,
        port,
        api_key,
        protocol,
        tls,
    }
}

fn endpoint_from_url(url: &str, protocol: Protocol) -> (Option<String>, Option<u16>, bool) {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed
                .host_str()
                .filter(|h| !h.is_empty())
                .map(str::to_string);
            // `Url::port` hides a port equal to the scheme default, so `:80`
            // and `:443` are recovered from the raw authority.
            let port = parsed
                .port()
                .or_else(|| {
                    authority_has_port(url)
                        .then(|| parsed.port_or_known_default())
                        .flatten()
                })
                .unwrap_or_else(|| protocol.canonical_port());
            (host, Some(port), parsed.scheme() == "https")
        }
        Err(e) => {
            tracing::warn!(url = url, error = %e, "Ignoring unparseable vector store URL");
            (None, None, false)
        }
    }
}

/// Whether the URL's authority carries a `:port` suffix
fn authority_has_port(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

fn port_from_value(value: &PortValue) -> Option<u16> {
    let port = value.as_port();
    if port.is_none() {
        tracing::warn!(port = ?value, "Ignoring invalid vector store port");
    }
    port
}
