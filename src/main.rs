use anyhow::Context;
use inertia_form::{
    configuration::get_configuration, pages::LoginPage, telemetry::init_subscriber,
};
use secrecy::ExposeSecret;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().context("failed to read configuration")?;
    init_subscriber(configuration.application.log_filter.clone());

    let login = LoginPage::new(
        configuration.server.login_page(),
        configuration
            .server
            .client()
            .context("failed to build the HTTP client")?,
        configuration.form.timeout(),
    );
    login.set_email(configuration.login.email.clone())?;
    login.set_password(configuration.login.password.expose_secret())?;

    let outcome = login.login().await;
    let snapshot = login.snapshot();
    tracing::info!(
        ?outcome,
        status = ?snapshot.status,
        errors = ?snapshot.errors,
        "Login submission settled"
    );
    login.dispose();

    if snapshot.was_successful() {
        Ok(())
    } else if let Some(notice) = snapshot.failure_notice() {
        Err(anyhow::anyhow!("login failed: {notice}"))
    } else {
        Err(anyhow::anyhow!("login rejected: {:?}", snapshot.errors))
    }
}
