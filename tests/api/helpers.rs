use std::time::Duration;

use inertia_form::{
    configuration::ServerSettings, pages::LoginPage, telemetry::init_subscriber,
    transport::InertiaClient,
};
use once_cell::sync::Lazy;
use serde_json::json;
use wiremock::{Match, MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber("debug".into());
    }
});

pub const ASSET_VERSION: &str = "5f3e1c";

pub struct TestApp {
    pub server: MockServer,
    pub login: LoginPage<InertiaClient>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_timeout(Duration::from_secs(2)).await
}

pub async fn spawn_app_with_timeout(form_timeout: Duration) -> TestApp {
    Lazy::force(&TRACING);

    let server = MockServer::start().await;
    let settings = ServerSettings {
        base_url: server.uri(),
        version: Some(ASSET_VERSION.into()),
        timeout_milliseconds: 2_000,
    };
    let client = settings.client().expect("Failed to build the HTTP client.");
    let login = LoginPage::new(settings.login_page(), client, form_timeout);

    TestApp { server, login }
}

/// An Inertia page answer for the login component carrying `props`.
pub fn login_page_response(props: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Inertia", "true")
        .insert_header("Vary", "X-Inertia")
        .set_body_json(json!({
            "component": "Auth/Login",
            "props": props,
            "url": "/auth/login",
            "version": ASSET_VERSION,
        }))
}

pub fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(409).insert_header("X-Inertia-Location", location)
}

/// Matches requests whose JSON body is exactly the given credentials.
pub struct CredentialsMatcher {
    pub email: String,
    pub password: String,
}

impl Match for CredentialsMatcher {
    fn matches(&self, request: &wiremock::Request) -> bool {
        match request.body_json::<serde_json::Value>() {
            Ok(body) => {
                body == json!({
                    "email": self.email,
                    "password": self.password,
                })
            }
            _ => false,
        }
    }
}
