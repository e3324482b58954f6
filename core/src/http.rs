//! Device page retrieval.
//!
//! Phones are contacted over HTTPS first with certificate validation
//! disabled, because they ship self-signed certificates. When the handshake
//! fails because the endpoint answered in plain HTTP, the request is repeated
//! once over `http://`. Every other failure is final for that address.

use std::error::Error as StdError;

use async_trait::async_trait;
use battcheck_common::config::ScanConfig;
use battcheck_common::network::address::{Address, Scheme};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{FetchError, ScanError};

/// Fragments (lowercase) of TLS errors raised when the peer answers a
/// ClientHello with plain HTTP.
const PLAIN_HTTP_MARKERS: &[&str] = &[
    "invalidcontenttype",
    "corrupt message",
    "wrong version number",
    "http response to https",
];

/// Retrieves the status page of one device.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of the device's root page.
    async fn fetch(&self, address: &Address) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a dedicated `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(cfg: &ScanConfig) -> Result<Self, ScanError> {
        let client: Client = Client::builder()
            .timeout(cfg.timeout())
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ScanError::Client)?;

        Ok(Self { client })
    }

    async fn get(&self, address: &Address, scheme: Scheme) -> reqwest::Result<Response> {
        self.client.get(address.url(scheme)).send().await
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, address: &Address) -> Result<String, FetchError> {
        let response: Response = match self.get(address, Scheme::Https).await {
            Ok(response) => response,
            Err(e) if is_plain_http_endpoint(&e) => {
                debug!("{address} - Fallback to HTTP");
                self.get(address, Scheme::Http)
                    .await
                    .map_err(|e| FetchError::Unreachable(describe(&e)))?
            }
            Err(e) => return Err(FetchError::Unreachable(describe(&e))),
        };

        debug!("Got response from {address} ({})", response.status());
        response
            .text()
            .await
            .map_err(|e| FetchError::Body(describe(&e)))
    }
}

/// True when `err`, or anything in its source chain, reports a TLS record
/// that was really a plain HTTP response.
pub fn is_plain_http_endpoint(err: &(dyn StdError + 'static)) -> bool {
    chain(err).any(|e| {
        let msg: String = e.to_string().to_lowercase();
        PLAIN_HTTP_MARKERS.iter().any(|marker| msg.contains(marker))
    })
}

/// The full error chain on one line, outermost first.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = Vec::new();
    for e in chain(err) {
        let msg: String = e.to_string();
        // io::Error and friends often repeat their source verbatim.
        if parts.last() != Some(&msg) {
            parts.push(msg);
        }
    }
    parts.join(": ")
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |e| (*e).source())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct Outer(io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("error sending request for url (https://10.0.0.1/)")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn detects_plain_http_in_source_chain() {
        let inner = io::Error::new(
            io::ErrorKind::InvalidData,
            "received corrupt message of type InvalidContentType",
        );
        let err = Outer(inner);
        assert!(is_plain_http_endpoint(&err));
    }

    #[test]
    fn openssl_style_mismatch_is_detected() {
        let err = io::Error::other("error:0A00010B:SSL routines::wrong version number");
        assert!(is_plain_http_endpoint(&err));
    }

    #[test]
    fn other_failures_are_not_mismatches() {
        let refused = Outer(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(!is_plain_http_endpoint(&refused));

        let timeout = io::Error::new(io::ErrorKind::TimedOut, "operation timed out");
        assert!(!is_plain_http_endpoint(&timeout));
    }

    #[test]
    fn describe_joins_chain() {
        let err = Outer(io::Error::new(io::ErrorKind::Other, "connection reset"));
        assert_eq!(
            describe(&err),
            "error sending request for url (https://10.0.0.1/): connection reset"
        );
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<dyn StdError + Send + Sync + 'static>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn walks_every_level_of_the_chain() {
        let err = Layer(
            "client error (Connect)",
            Some(Box::new(Layer(
                "tls handshake",
                Some(Box::new(Layer("received corrupt message of type InvalidContentType", None))),
            ))),
        );

        assert_eq!(chain(&err).count(), 3);
        assert!(is_plain_http_endpoint(&err));
        assert_eq!(
            describe(&err),
            "client error (Connect): tls handshake: received corrupt message of type InvalidContentType"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = HttpFetcher::new(&ScanConfig {
            timeout_secs: 2,
            ..ScanConfig::default()
        })
        .unwrap();
        let address = Address::parse(&format!("127.0.0.1:{port}")).unwrap();

        let result = fetcher.fetch(&address).await;
        assert!(matches!(result, Err(FetchError::Unreachable(_))));
    }
}
