//! SNI hostname derivation from the backend endpoint string.

use std::fmt;

use url::{Host, Url};

/// Why no SNI hostname could be derived from the endpoint.
///
/// Carried on a successful [`SecureClientConfig`](super::SecureClientConfig);
/// never returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointWarning {
    /// The server string is not a URL.
    Unparseable { server: String, reason: String },
    /// The URL parsed but has no host component.
    MissingHost { server: String },
}

impl fmt::Display for EndpointWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable { server, reason } => {
                write!(f, "server '{server}' is not a valid URL ({reason}); SNI left unset")
            }
            Self::MissingHost { server } => {
                write!(f, "server '{server}' has no host; SNI left unset")
            }
        }
    }
}

/// Result of deriving an SNI hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SniOutcome {
    /// Hostname to send, without port or IPv6 brackets.
    Host(String),
    /// No hostname could be derived.
    Skipped(EndpointWarning),
}

/// Take the host component of `server`, dropping any port.
pub fn derive_server_name(server: &str) -> SniOutcome {
    let url = match Url::parse(server) {
        Ok(url) => url,
        Err(err) => {
            return SniOutcome::Skipped(EndpointWarning::Unparseable {
                server: server.to_string(),
                reason: err.to_string(),
            })
        }
    };

    match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => SniOutcome::Host(domain.to_string()),
        Some(Host::Ipv4(addr)) => SniOutcome::Host(addr.to_string()),
        Some(Host::Ipv6(addr)) => SniOutcome::Host(addr.to_string()),
        _ => SniOutcome::Skipped(EndpointWarning::MissingHost { server: server.to_string() }),
    }
}
