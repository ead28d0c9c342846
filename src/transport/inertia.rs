use std::time::Duration;

use anyhow::Context;
use reqwest::{StatusCode, header};

use super::{SubmitSuccess, Transport, TransportError};
use crate::{domain::SubmissionRequest, page::Page};

const INERTIA: &str = "X-Inertia";
const INERTIA_VERSION: &str = "X-Inertia-Version";
const INERTIA_LOCATION: &str = "X-Inertia-Location";

/// Posts form submissions the way an Inertia client does, and maps the
/// server's answer onto [`SubmitSuccess`] or [`TransportError`].
#[derive(Debug)]
pub struct InertiaClient {
    base_url: String,
    http_client: reqwest::Client,
    version: Option<String>,
    timeout: Duration,
}

impl InertiaClient {
    /// `version` is the asset version announced when a request does not
    /// carry the one of its page. Cookies set by the server are kept and
    /// sent back on later submissions.
    pub fn new(
        base_url: String,
        version: Option<String>,
        timeout: Duration,
    ) -> Result<InertiaClient, reqwest::Error> {
        let http_client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(InertiaClient {
            base_url,
            http_client,
            version,
            timeout,
        })
    }

    async fn post(
        &self,
        endpoint: &str,
        request: &SubmissionRequest,
    ) -> Result<SubmitSuccess, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut builder = self
            .http_client
            .post(url)
            .json(request.fields())
            .header(INERTIA, "true")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::ACCEPT, "text/html, application/xhtml+xml")
            .timeout(self.timeout);
        if let Some(version) = request.version().or(self.version.as_deref()) {
            builder = builder.header(INERTIA_VERSION, version);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach the form endpoint.")?;

        if response.status() == StatusCode::CONFLICT {
            if let Some(location) = response
                .headers()
                .get(INERTIA_LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                return Ok(SubmitSuccess {
                    location: Some(location.to_string()),
                    component: None,
                });
            }
        }

        let response = response
            .error_for_status()
            .context("The form endpoint answered with an error status.")?;

        let is_page = response
            .headers()
            .get(INERTIA)
            .is_some_and(|value| value == "true");
        if !is_page {
            return Ok(SubmitSuccess::default());
        }

        let page: Page = response
            .json()
            .await
            .context("Failed to decode the page returned by the form endpoint.")?;
        if let Some(errors) = page.validation_errors() {
            return Err(TransportError::Validation(errors));
        }

        Ok(SubmitSuccess {
            location: None,
            component: Some(page.component),
        })
    }
}

impl Transport for InertiaClient {
    #[tracing::instrument(
        name = "Send form submission",
        skip(self, request),
        fields(submission_id = %request.id(), status = tracing::field::Empty)
    )]
    async fn send(
        &self,
        endpoint: &str,
        request: &SubmissionRequest,
    ) -> Result<SubmitSuccess, TransportError> {
        let result = self.post(endpoint, request).await;
        let status = match &result {
            Ok(_) => "accepted",
            Err(TransportError::Validation(_)) => "invalid",
            Err(TransportError::Unexpected(_)) => "failed",
        };
        tracing::Span::current().record("status", status);
        result
    }
}
