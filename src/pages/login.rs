use std::time::Duration;

use tokio::sync::watch;

use crate::{
    domain::{FieldStore, UnknownFieldError},
    form::{FormHandle, FormSnapshot, SubmitOutcome},
    page::Page,
    transport::Transport,
};

pub const LOGIN_ENDPOINT: &str = "/auth/login";

const EMAIL: &str = "email";
const PASSWORD: &str = "password";

/// The login form: an email and a password posted to [`LOGIN_ENDPOINT`].
pub struct LoginPage<T> {
    page: Page,
    form: FormHandle<T>,
}

impl<T: Transport> LoginPage<T> {
    #[tracing::instrument(name = "Mount login page", skip_all, fields(component = %page.component))]
    pub fn new(page: Page, transport: T, timeout: Duration) -> LoginPage<T> {
        tracing::debug!(props = %page.props, "Page props");
        let fields = FieldStore::new([(EMAIL, ""), (PASSWORD, "")]);
        let form = FormHandle::new(LOGIN_ENDPOINT, fields, transport, timeout)
            .with_version(page.version.clone());
        LoginPage { page, form }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn set_email(&self, email: impl Into<String>) -> Result<(), UnknownFieldError> {
        self.form.set_field(EMAIL, email)
    }

    pub fn set_password(&self, password: impl Into<String>) -> Result<(), UnknownFieldError> {
        self.form.set_field(PASSWORD, password)
    }

    pub async fn login(&self) -> SubmitOutcome {
        self.form.submit().await
    }

    pub fn email_error(&self) -> Option<String> {
        self.snapshot().error(EMAIL).map(ToString::to_string)
    }

    pub fn password_error(&self) -> Option<String> {
        self.snapshot().error(PASSWORD).map(ToString::to_string)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.form.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.form.subscribe()
    }

    pub fn form(&self) -> &FormHandle<T> {
        &self.form
    }

    /// Tears the page down; an answer still in flight will be ignored.
    pub fn dispose(&self) {
        self.form.dispose();
    }
}
