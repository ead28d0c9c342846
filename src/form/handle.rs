use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Context;
use tokio::sync::watch;

use super::{FormController, FormSnapshot};
use crate::{
    domain::{FieldStore, UnknownFieldError},
    transport::{Transport, TransportError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight, or the form is disposed.
    Ignored,
    /// The response settled the submission.
    Applied,
    /// The response arrived after the form stopped waiting for it.
    Discarded,
}

/// Drives a [`FormController`] on a single thread, sending its submissions
/// through a [`Transport`].
///
/// Clones share the same form. The controller is only borrowed between
/// suspension points, so views can keep reading snapshots while a
/// submission is in flight.
pub struct FormHandle<T> {
    controller: Rc<RefCell<FormController>>,
    transport: Rc<T>,
    timeout: Duration,
}

impl<T> Clone for FormHandle<T> {
    fn clone(&self) -> Self {
        FormHandle {
            controller: Rc::clone(&self.controller),
            transport: Rc::clone(&self.transport),
            timeout: self.timeout,
        }
    }
}

impl<T: Transport> FormHandle<T> {
    pub fn new(
        endpoint: impl Into<String>,
        fields: FieldStore,
        transport: T,
        timeout: Duration,
    ) -> FormHandle<T> {
        FormHandle {
            controller: Rc::new(RefCell::new(FormController::new(endpoint, fields))),
            transport: Rc::new(transport),
            timeout,
        }
    }

    pub fn set_field(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        self.controller.borrow_mut().set_field(name, value)
    }

    /// Sends `version` as the page's asset version with every submission.
    pub fn with_version(self, version: Option<String>) -> FormHandle<T> {
        self.controller.borrow_mut().set_version(version);
        self
    }

    pub fn reset(&self) {
        self.controller.borrow_mut().reset();
    }

    pub fn commit_defaults(&self) {
        self.controller.borrow_mut().commit_defaults();
    }

    pub fn reset_field(&self, name: &str) -> Result<(), UnknownFieldError> {
        self.controller.borrow_mut().reset_field(name)
    }

    pub fn clear_errors(&self) {
        self.controller.borrow_mut().clear_errors();
    }

    pub fn clear_error(&self, name: &str) -> Result<(), UnknownFieldError> {
        self.controller.borrow_mut().clear_error(name)
    }

    pub fn set_error(
        &self,
        name: &str,
        message: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        self.controller.borrow_mut().set_error(name, message)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.controller.borrow().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.controller.borrow().subscribe()
    }

    pub fn dispose(&self) {
        self.controller.borrow_mut().dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.controller.borrow().is_disposed()
    }

    /// Submits the current values and applies the response.
    ///
    /// Never fails: validation and transport failures end up in the
    /// form's snapshot. Calling it while a submission is in flight does
    /// nothing.
    #[tracing::instrument(
        name = "Submit form",
        skip(self),
        fields(endpoint = tracing::field::Empty, submission_id = tracing::field::Empty)
    )]
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut controller = self.controller.borrow_mut();
            controller.begin_submission()
        };
        let Some(request) = request else {
            tracing::debug!("Submission ignored");
            return SubmitOutcome::Ignored;
        };
        tracing::Span::current()
            .record("endpoint", tracing::field::display(request.endpoint()))
            .record("submission_id", tracing::field::display(request.id()));

        let response = tokio::time::timeout(
            self.timeout,
            self.transport.send(request.endpoint(), &request),
        )
        .await
        .context("The form endpoint took too long to answer.")
        .map_err(TransportError::Unexpected)
        .and_then(|response| response);

        let applied = self
            .controller
            .borrow_mut()
            .apply_response(request.id(), response);
        if applied {
            SubmitOutcome::Applied
        } else {
            SubmitOutcome::Discarded
        }
    }
}
