use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{cookie::Jar, header::CONTENT_DISPOSITION, header::CONTENT_TYPE, Client};
use shared::{
    error::SubmitError,
    protocol::{InvoiceDocument, InvoiceRequest, DEFAULT_INVOICE_FILENAME},
};
use tracing::{error, info};
use url::Url;

pub mod config;
pub mod controller;
pub mod disposition;
pub mod download;

pub use config::{load_settings, ClientSettings};
pub use controller::{
    DownloadedFile, FormController, FormEvent, Notification, NotificationKind, SubmissionOutcome,
};
pub use disposition::filename_from_content_disposition;
pub use download::{DirectoryDownloadSink, DownloadSink};

/// Remote document generator behind the form.
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    async fn request_invoice(&self, request: &InvoiceRequest)
        -> Result<InvoiceDocument, SubmitError>;
}

pub struct HttpInvoiceApi {
    http: Client,
    endpoint: Url,
}

impl HttpInvoiceApi {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let endpoint = settings.invoice_endpoint()?;

        // Credentials mode: cookies set by the endpoint are replayed on later requests.
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = settings.session_cookie.as_deref() {
            jar.add_cookie_str(cookie, &endpoint);
        }

        let http = Client::builder()
            .cookie_provider(jar)
            .build()
            .context("failed to build invoice http client")?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn transport_error(err: reqwest::Error) -> SubmitError {
    SubmitError::Transport(err.to_string())
}

#[async_trait]
impl InvoiceApi for HttpInvoiceApi {
    async fn request_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<InvoiceDocument, SubmitError> {
        info!(endpoint = %self.endpoint, cards_count = request.cards_count, "requesting invoice");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        info!(%status, "invoice response received");

        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            error!(%status, body = %body, "invoice request rejected");
            return Err(SubmitError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .and_then(|value| filename_from_content_disposition(&value))
            .unwrap_or_else(|| DEFAULT_INVOICE_FILENAME.to_string());
        info!(filename = %filename, "resolved document filename");

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(transport_error)?;
        info!(size = bytes.len(), "document body received");

        Ok(InvoiceDocument {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
