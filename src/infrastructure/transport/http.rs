//! HTTP Upload Transport
//!
//! Posts each file as a single multipart form part named `file` to a fixed
//! endpoint. The endpoint answers with JSON like `{"result": true, ...}`.
//!
//! Success needs both gates: status 200 and `result == true`. A body that
//! claims success under any other status is still a failure.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::domain::ports::{source_file_name, TransferError, Transport};
use crate::domain::value_objects::{Destination, Scheme, TransferOutcome};
use crate::error::{FerryError, FerryResult, Violation};

const CONTENT_TYPE: &str = "application/octet-stream";

/// Body returned by the upload endpoint; other fields are ignored
#[derive(Debug, Deserialize)]
struct EnqueueResponse {
    #[serde(default)]
    result: bool,
}

/// Transport that uploads via multipart POST
#[derive(Debug)]
pub struct HttpUpload {
    destination: Destination,
    endpoint: Url,
    client: Client,
}

impl HttpUpload {
    pub fn new(destination: Destination) -> FerryResult<Self> {
        if !matches!(destination.scheme(), Scheme::Http | Scheme::Https) {
            return Err(destination.reject(vec![Violation::constraint(format!(
                "scheme must be 'http' or 'https', got '{}'",
                destination.scheme()
            ))]));
        }
        // Nothing is configurable, so any query key is unknown.
        destination
            .options()
            .decoder()
            .finish()
            .map_err(|violations| destination.reject(violations))?;
        if destination.host().is_none() {
            return Err(destination.reject(vec![Violation::constraint("hostname is required")]));
        }

        // No request deadline; callers bound latency themselves.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| {
                FerryError::configuration(
                    destination.display_name(),
                    Violation::constraint(format!("cannot build HTTP client: {e}")),
                )
            })?;

        Ok(Self {
            endpoint: destination.endpoint(),
            destination,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpUpload {
    fn kind(&self) -> &'static str {
        "http"
    }

    fn display_name(&self) -> String {
        self.destination.display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        let name = source_file_name(source)?;
        let file = File::open(source)?;
        let length = file.metadata()?.len();
        let part = multipart::Part::reader_with_length(file, length)
            .file_name(name)
            .mime_str(CONTENT_TYPE)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "upload rejected");
            return Ok(TransferOutcome::failed(format!("endpoint answered {status}"))
                .with_status(status.as_u16()));
        }

        let body: EnqueueResponse = response.json()?;
        debug!(status = status.as_u16(), result = body.result, "upload response");
        let outcome = if body.result {
            TransferOutcome::succeeded()
        } else {
            TransferOutcome::failed("endpoint reported result=false")
        };
        Ok(outcome.with_status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(HttpUpload::new(Destination::parse("http://h/enqueue").unwrap()).is_ok());
        let https = HttpUpload::new(Destination::parse("https://h:8443/up").unwrap()).unwrap();
        assert_eq!(https.endpoint().as_str(), "https://h:8443/up");
    }

    #[test]
    fn rejects_any_query_option() {
        let err = HttpUpload::new(Destination::parse("http://h/enqueue?token=abc").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("unknown option(s): token"), "{err}");
    }

    #[test]
    fn rejects_other_schemes() {
        let err = HttpUpload::new(Destination::parse("file:///tmp").unwrap()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn response_result_defaults_to_false() {
        let body: EnqueueResponse = serde_json::from_str(r#"{"processed": true}"#).unwrap();
        assert!(!body.result);
    }
}
