//! Blocking TLS transport backed by ureq.
//!
//! # Design
//! Every `execute` call builds a fresh `Agent` and drops it before returning,
//! so the connection is closed whether the exchange succeeded or not and
//! nothing is pooled between calls. Certificates are checked against the
//! platform trust store. Redirects are not followed and 4xx/5xx statuses come
//! back as data; only failures below HTTP become `TransportError`.

use std::io;

use poster_core::{HttpRequest, HttpResponse, Transport, TransportError};
use tracing::debug;
use ureq::tls::{RootCerts, TlsConfig};
use ureq::Agent;

#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(&self) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .tls_config(TlsConfig::builder().root_certs(RootCerts::PlatformVerifier).build())
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent();

        let mut builder = agent.post(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send(request.body.as_bytes()).map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;
        debug!(status, "exchange complete");

        Ok(HttpResponse { status, headers, body })
    }
}

/// Sort a ureq failure by where it happened: before sending, while
/// connecting, during the TLS handshake, or while reading the response.
///
/// rustls reports handshake and record errors as `InvalidData` I/O errors.
fn classify(err: ureq::Error) -> TransportError {
    use ureq::Error as E;

    match err {
        E::Io(e) if e.kind() == io::ErrorKind::InvalidData => TransportError::TlsFailed(e.to_string()),
        E::Io(e) => TransportError::ConnectionFailed(e.to_string()),
        E::Tls { .. } => TransportError::TlsFailed(err.to_string()),
        E::HostNotFound { .. } | E::ConnectionFailed { .. } | E::Timeout { .. } | E::ConnectProxyFailed { .. } => {
            TransportError::ConnectionFailed(err.to_string())
        }
        E::Http { .. } | E::BadUri { .. } | E::RequireHttpsOnly { .. } | E::InvalidProxyUrl { .. } => {
            TransportError::RequestRejected(err.to_string())
        }
        E::Protocol { .. }
        | E::LargeResponseHeader { .. }
        | E::BodyExceedsLimit { .. }
        | E::TooManyRedirects { .. }
        | E::RedirectFailed { .. } => TransportError::MalformedResponse(err.to_string()),
        // StatusCode cannot occur with http_status_as_error(false).
        other => TransportError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_data_is_a_tls_failure() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::InvalidData, "corrupt message"));
        assert!(matches!(classify(err), TransportError::TlsFailed(_)));
    }

    #[test]
    fn refused_is_a_connection_failure() {
        let err = ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(classify(err), TransportError::ConnectionFailed(_)));
        assert!(matches!(classify(ureq::Error::HostNotFound), TransportError::ConnectionFailed(_)));
    }

    #[test]
    fn bad_uri_is_rejected_before_sending() {
        assert!(matches!(
            classify(ureq::Error::BadUri("no host".to_string())),
            TransportError::RequestRejected(_)
        ));
    }

    #[test]
    fn tls_config_error_is_a_tls_failure() {
        assert!(matches!(
            classify(ureq::Error::Tls("no root certificates")),
            TransportError::TlsFailed(_)
        ));
    }
}
