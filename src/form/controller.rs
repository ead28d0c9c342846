use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::watch;

use crate::{
    domain::{
        ErrorMap, FieldStore, FieldValues, Settlement, SubmissionId, SubmissionLifecycle,
        SubmissionRequest, SubmissionStatus, UnknownFieldError,
    },
    transport::{SubmitSuccess, TransportError},
};

/// Everything a view needs to render a form, read at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub values: FieldValues,
    pub errors: BTreeMap<String, String>,
    pub processing: bool,
    pub status: SubmissionStatus,
    pub dirty: bool,
}

impl FormSnapshot {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn was_successful(&self) -> bool {
        matches!(self.status, SubmissionStatus::Succeeded { .. })
    }

    /// Message to show when the last submission failed without any field
    /// to attach it to.
    pub fn failure_notice(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failed { notice } => Some(notice.as_str()),
            _ => None,
        }
    }
}

/// State machine behind a form: field values, server errors and the
/// submission in flight.
///
/// Every mutation publishes a fresh [`FormSnapshot`] to subscribers. Once
/// disposed, the controller ignores mutations and responses and publishes
/// nothing more.
#[derive(Debug)]
pub struct FormController {
    endpoint: String,
    version: Option<String>,
    fields: FieldStore,
    errors: ErrorMap,
    lifecycle: SubmissionLifecycle,
    disposed: bool,
    notifier: watch::Sender<FormSnapshot>,
}

impl FormController {
    pub fn new(endpoint: impl Into<String>, fields: FieldStore) -> FormController {
        let errors = ErrorMap::default();
        let lifecycle = SubmissionLifecycle::default();
        let (notifier, _) = watch::channel(build_snapshot(&fields, &errors, &lifecycle));
        FormController {
            endpoint: endpoint.into(),
            version: None,
            fields,
            errors,
            lifecycle,
            disposed: false,
            notifier,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        build_snapshot(&self.fields, &self.errors, &self.lifecycle)
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.notifier.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Asset version sent along with every later submission.
    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        if self.disposed {
            return self.check_declared(name);
        }
        self.fields.set_field(name, value)?;
        self.publish();
        Ok(())
    }

    pub fn reset(&mut self) {
        if self.disposed {
            return;
        }
        self.fields.reset();
        self.publish();
    }

    pub fn reset_field(&mut self, name: &str) -> Result<(), UnknownFieldError> {
        if self.disposed {
            return self.check_declared(name);
        }
        self.fields.reset_field(name)?;
        self.publish();
        Ok(())
    }

    pub fn clear_errors(&mut self) {
        if self.disposed {
            return;
        }
        self.errors.clear();
        self.publish();
    }

    pub fn clear_error(&mut self, name: &str) -> Result<(), UnknownFieldError> {
        self.check_declared(name)?;
        if self.disposed {
            return Ok(());
        }
        self.errors.clear_field(name);
        self.publish();
        Ok(())
    }

    /// Makes the current values the new defaults, so the form is no longer
    /// dirty and `reset` comes back to them.
    pub fn commit_defaults(&mut self) {
        if self.disposed {
            return;
        }
        self.fields.commit_defaults();
        self.publish();
    }

    pub fn set_error(
        &mut self,
        name: &str,
        message: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        self.check_declared(name)?;
        if self.disposed {
            return Ok(());
        }
        self.errors.set_error(name, message);
        self.publish();
        Ok(())
    }

    /// Starts a submission of the current values. Returns `None`, changing
    /// nothing, while another submission is in flight or after disposal.
    pub fn begin_submission(&mut self) -> Option<SubmissionRequest> {
        if self.disposed {
            return None;
        }
        let request = self
            .lifecycle
            .begin(&self.endpoint, self.fields.snapshot())?
            .with_version(self.version.clone());
        self.errors.clear();
        tracing::debug!(submission_id = %request.id(), "Form submission started");
        self.publish();
        Some(request)
    }

    /// Applies the transport's answer to submission `id`. Returns `false`
    /// when the answer was discarded: the controller is disposed or `id` is
    /// no longer in flight.
    pub fn apply_response(
        &mut self,
        id: SubmissionId,
        response: Result<SubmitSuccess, TransportError>,
    ) -> bool {
        if self.disposed {
            tracing::debug!(submission_id = %id, "Discarding a response for a disposed form");
            return false;
        }

        // A rejection that names no field is shown as an opaque failure.
        let response = match response {
            Err(TransportError::Validation(errors)) if errors.is_empty() => {
                Err(TransportError::Unexpected(anyhow::anyhow!(
                    "The form endpoint rejected the submission without naming a field."
                )))
            }
            other => other,
        };

        let (settlement, errors) = match response {
            Ok(SubmitSuccess { location, .. }) => (Settlement::Success { location }, None),
            Err(TransportError::Validation(errors)) => (Settlement::Invalid, Some(errors)),
            Err(e @ TransportError::Unexpected(_)) => {
                tracing::error!(
                    submission_id = %id,
                    error.message = %e,
                    error.cause_chain = ?e,
                    "Form submission failed"
                );
                (
                    Settlement::Failed {
                        notice: e.to_string(),
                    },
                    None,
                )
            }
        };

        if !self.lifecycle.settle(id, settlement) {
            tracing::warn!(submission_id = %id, "Discarding a response for a stale submission");
            return false;
        }
        match errors {
            Some(errors) => self.errors.set_errors(errors),
            None => self.errors.clear(),
        }
        tracing::debug!(
            submission_id = %id,
            status = ?self.lifecycle.status(),
            "Form submission settled"
        );
        self.publish();
        true
    }

    /// Marks the controller inert. Later responses are discarded and
    /// subscribers hear nothing more.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn check_declared(&self, name: &str) -> Result<(), UnknownFieldError> {
        if self.fields.contains(name) {
            Ok(())
        } else {
            Err(UnknownFieldError {
                name: name.to_string(),
            })
        }
    }

    fn publish(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}

fn build_snapshot(
    fields: &FieldStore,
    errors: &ErrorMap,
    lifecycle: &SubmissionLifecycle,
) -> FormSnapshot {
    FormSnapshot {
        values: fields.snapshot(),
        errors: errors.to_map(),
        processing: lifecycle.is_processing(),
        status: lifecycle.status().clone(),
        dirty: fields.is_dirty(),
    }
}
