use serde::Serialize;
use uuid::Uuid;

use super::FieldValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    fn generate() -> SubmissionId {
        SubmissionId(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Field values frozen at the moment a submission started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    id: SubmissionId,
    endpoint: String,
    fields: FieldValues,
    version: Option<String>,
}

impl SubmissionRequest {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    /// Asset version of the page the form was mounted on.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn with_version(mut self, version: Option<String>) -> SubmissionRequest {
        self.version = version;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded {
        location: Option<String>,
    },
    /// The server rejected one or more fields.
    Invalid,
    /// The submission failed without any field to blame.
    Failed {
        notice: String,
    },
}

impl SubmissionStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, SubmissionStatus::Idle | SubmissionStatus::InFlight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Success { location: Option<String> },
    Invalid,
    Failed { notice: String },
}

/// Tracks the one submission a form may have in flight.
#[derive(Debug, Default)]
pub struct SubmissionLifecycle {
    status: SubmissionStatus,
    current: Option<SubmissionId>,
}

impl SubmissionLifecycle {
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_processing(&self) -> bool {
        self.status == SubmissionStatus::InFlight
    }

    /// Starts a submission of `fields`, or returns `None` when one is
    /// already in flight.
    pub fn begin(&mut self, endpoint: &str, fields: FieldValues) -> Option<SubmissionRequest> {
        if self.is_processing() {
            return None;
        }
        let id = SubmissionId::generate();
        self.current = Some(id);
        self.status = SubmissionStatus::InFlight;
        Some(SubmissionRequest {
            id,
            endpoint: endpoint.to_string(),
            fields,
            version: None,
        })
    }

    /// Settles the in-flight submission. Returns `false`, changing nothing,
    /// when `id` is not the submission currently in flight.
    pub fn settle(&mut self, id: SubmissionId, settlement: Settlement) -> bool {
        if !self.is_processing() || self.current != Some(id) {
            return false;
        }
        self.current = None;
        self.status = match settlement {
            Settlement::Success { location } => SubmissionStatus::Succeeded { location },
            Settlement::Invalid => SubmissionStatus::Invalid,
            Settlement::Failed { notice } => SubmissionStatus::Failed { notice },
        };
        true
    }
}
