mod inertia;

use crate::domain::{SubmissionRequest, ValidationErrors};

pub use inertia::InertiaClient;

/// What a form receives back when the server accepted a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitSuccess {
    /// Where the server asked the client to go next, if anywhere.
    pub location: Option<String>,
    /// Component of the page the server answered with.
    pub component: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("{} field(s) failed validation", .0.len())]
    Validation(ValidationErrors),
    #[error("Something went wrong")]
    Unexpected(#[from] anyhow::Error),
}

/// Sends a frozen set of field values to a form endpoint.
pub trait Transport {
    fn send(
        &self,
        endpoint: &str,
        request: &SubmissionRequest,
    ) -> impl Future<Output = Result<SubmitSuccess, TransportError>>;
}
