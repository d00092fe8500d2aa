//! Network boundary trait for testability
//!
//! Services submit forms through [`FormTransport`], so they can be tested
//! with canned result pages instead of a live service.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Proxy;
use tracing::{debug, instrument, warn};

use crate::application::ApplicationError;
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult, TransportError};

/// Form fields in submission order.
pub type FormFields = Vec<(&'static str, String)>;

/// Submits an `application/x-www-form-urlencoded` POST and returns the body.
pub trait FormTransport: Send + Sync {
    /// POST `form` to `url`. Any non-success status is an error.
    fn post_form(&self, url: &str, form: &[(&'static str, String)]) -> Result<String, TransportError>;
}

// ============================================================
// REAL IMPLEMENTATION
// ============================================================

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client from settings (timeout, proxy, certificate policy).
    pub fn new(settings: &Settings) -> InfraResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if settings.accept_invalid_certs {
            warn!("TLS certificate verification disabled: any certificate presented by the endpoint is trusted");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = &settings.proxy {
            debug!("routing requests through proxy {proxy_url}");
            let proxy = Proxy::all(proxy_url).map_err(|e| ApplicationError::Config {
                message: format!("invalid proxy {proxy_url}: {e}"),
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| InfraError::HttpClient {
            message: e.to_string(),
        })?;

        Ok(Self { client })
    }
}

impl FormTransport for HttpTransport {
    #[instrument(level = "debug", skip(self, form), fields(fields = form.len()))]
    fn post_form(&self, url: &str, form: &[(&'static str, String)]) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status();
        debug!("response status: {status}");
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .map_err(|e| TransportError::from_reqwest(url, e))
    }
}
