use std::time::Duration;

use assertor::*;
use fake::{
    Fake,
    faker::internet::en::{Password, SafeEmail},
};
use inertia_form::{
    domain::SubmissionStatus, form::SubmitOutcome, page::Page, pages::LoginPage,
    transport::InertiaClient,
};
use serde_json::json;
use wiremock::{Mock, ResponseTemplate, matchers};

use crate::helpers::{
    ASSET_VERSION, CredentialsMatcher, login_page_response, redirect_to, spawn_app,
    spawn_app_with_timeout,
};

#[tokio::test]
async fn login_posts_the_typed_credentials() {
    let app = spawn_app().await;
    let email: String = SafeEmail().fake();
    let password: String = Password(12..20).fake();

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/auth/login"))
        .and(matchers::header("X-Inertia", "true"))
        .and(matchers::header("X-Inertia-Version", ASSET_VERSION))
        .and(matchers::header("Content-Type", mime::APPLICATION_JSON.as_ref()))
        .and(CredentialsMatcher {
            email: email.clone(),
            password: password.clone(),
        })
        .respond_with(redirect_to("/"))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.set_email(email).unwrap();
    app.login.set_password(password).unwrap();
    let outcome = app.login.login().await;

    assert_that!(outcome).is_equal_to(SubmitOutcome::Applied);
}

#[tokio::test]
async fn a_successful_login_follows_the_server_redirect() {
    let app = spawn_app().await;

    Mock::given(matchers::any())
        .respond_with(redirect_to("/"))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.set_email("johndoe@example.com").unwrap();
    app.login.set_password("secret").unwrap();
    app.login.login().await;

    let snapshot = app.login.snapshot();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.has_errors()).is_false();
    assert_that!(snapshot.status).is_equal_to(SubmissionStatus::Succeeded {
        location: Some("/".into()),
    });
}

#[tokio::test]
async fn invalid_credentials_are_shown_on_the_email_field() {
    let app = spawn_app().await;

    Mock::given(matchers::any())
        .respond_with(login_page_response(json!({
            "auth": { "user": null },
            "flash": { "errors": { "email": ["Invalid email or password"] } },
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.set_email("random@example.com").unwrap();
    app.login.set_password("random-password").unwrap();
    app.login.login().await;

    let snapshot = app.login.snapshot();
    assert_that!(app.login.email_error()).has_value("Invalid email or password".to_string());
    assert_that!(app.login.password_error()).is_none();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.status).is_equal_to(SubmissionStatus::Invalid);
}

#[tokio::test]
async fn errors_from_a_previous_attempt_do_not_survive_a_new_one() {
    let app = spawn_app().await;

    Mock::given(matchers::any())
        .respond_with(login_page_response(json!({
            "errors": { "email": "invalid", "password": "required" },
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(matchers::any())
        .respond_with(login_page_response(json!({ "errors": { "email": "invalid" } })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.login().await;
    assert_that!(app.login.password_error()).has_value("required".to_string());

    app.login.set_password("secret").unwrap();
    app.login.login().await;

    assert_that!(app.login.email_error()).has_value("invalid".to_string());
    assert_that!(app.login.password_error()).is_none();
}

#[tokio::test]
async fn a_server_error_is_reported_without_field_errors() {
    let app = spawn_app().await;

    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.set_email("a@b.com").unwrap();
    app.login.set_password("x").unwrap();
    app.login.login().await;

    let snapshot = app.login.snapshot();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.has_errors()).is_false();
    assert_that!(snapshot.failure_notice()).has_value("Something went wrong");
}

#[tokio::test]
async fn the_mounted_page_version_is_announced() {
    let server = wiremock::MockServer::start().await;
    let login = LoginPage::new(
        Page::new("Auth/Login", "/auth/login").with_version(Some("v1".into())),
        InertiaClient::new(server.uri(), None, Duration::from_millis(500)).unwrap(),
        Duration::from_secs(1),
    );

    Mock::given(matchers::header("X-Inertia-Version", "v1"))
        .respond_with(redirect_to("/"))
        .expect(1)
        .mount(&server)
        .await;

    login.login().await;

    assert_that!(login.snapshot().was_successful()).is_true();
}

#[tokio::test]
async fn a_rejection_with_only_blank_messages_shows_a_notice() {
    let app = spawn_app().await;

    Mock::given(matchers::any())
        .respond_with(login_page_response(json!({ "errors": { "email": "  " } })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.login().await;

    let snapshot = app.login.snapshot();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.has_errors()).is_false();
    assert_that!(snapshot.failure_notice()).has_value("Something went wrong");
}

#[tokio::test]
async fn an_unreachable_server_is_reported_without_field_errors() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let login = LoginPage::new(
        Page::new("Auth/Login", "/auth/login"),
        InertiaClient::new(format!("http://127.0.0.1:{port}"), None, Duration::from_millis(500))
            .unwrap(),
        Duration::from_secs(1),
    );

    login.login().await;

    let snapshot = login.snapshot();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.has_errors()).is_false();
    assert_that!(snapshot.failure_notice().is_some()).is_true();
}

#[tokio::test]
async fn a_slow_server_fails_the_submission_after_the_form_timeout() {
    let app = spawn_app_with_timeout(Duration::from_millis(200)).await;

    Mock::given(matchers::any())
        .respond_with(redirect_to("/").set_delay(Duration::from_millis(1_000)))
        .expect(1)
        .mount(&app.server)
        .await;

    app.login.login().await;

    let snapshot = app.login.snapshot();
    assert_that!(snapshot.processing).is_false();
    assert_that!(snapshot.failure_notice()).has_value("Something went wrong");
}
