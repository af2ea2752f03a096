mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::json;
use stanceline::application_impl::*;
use stanceline::application_port::*;
use stanceline::domain_model::*;
use stanceline::domain_port::*;
use std::sync::Arc;

fn backend() -> ScriptedTransport {
    ScriptedTransport::new(|request, _| match request.path.as_str() {
        LOGIN_PATH => {
            let body = request.body.clone().unwrap_or_default();
            if body["password"] == "hunter2" {
                ok(json!({ "access_token": "a1", "refresh_token": "r1" }))
            } else {
                json(StatusCode::UNAUTHORIZED, json!({ "detail": "Invalid credentials" }))
            }
        }
        SIGNUP_PATH => {
            let body = request.body.clone().unwrap_or_default();
            if body["username"] == "taken" {
                json(StatusCode::BAD_REQUEST, json!({ "detail": "User already exists" }))
            } else {
                ok(json!({ "id": 7, "username": body["username"] }))
            }
        }
        LOGOUT_PATH => ok(json!({ "message": "Logged out" })),
        _ => status(StatusCode::NOT_FOUND),
    })
}

fn login_input(password: &str) -> LoginInput {
    LoginInput {
        username: "ada".into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn login_installs_and_persists_tokens() {
    let transport = Arc::new(backend());
    let (storage, tokens) = token_store(None);
    let mut events = tokens.subscribe();
    let auth = RealAuthService::new(transport.clone(), tokens.clone());

    auth.login(login_input("hunter2")).await.unwrap();

    assert_eq!(tokens.current(), pair("a1", "r1"));
    assert_eq!(storage.load(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("a1"));
    assert_eq!(storage.load(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r1"));
    assert_eq!(events.try_recv().unwrap(), TokenEvent::Updated);

    let call = &transport.calls_to(LOGIN_PATH)[0];
    assert_eq!(call.bearer, None);
    assert_eq!(call.body.as_ref().unwrap()["username"], "ada");
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let (_, tokens) = token_store(None);
    let auth = RealAuthService::new(Arc::new(backend()), tokens.clone());

    let result = auth.login(login_input("nope")).await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn signup_logs_in_afterwards() {
    let transport = Arc::new(backend());
    let (_, tokens) = token_store(None);
    let auth = RealAuthService::new(transport.clone(), tokens.clone());

    let user_id = auth
        .signup(SignupInput {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "hunter2".into(),
            full_name: Some("Ada Lovelace".into()),
        })
        .await
        .unwrap();

    assert_eq!(user_id, UserId(7));
    assert_eq!(tokens.current(), pair("a1", "r1"));
    let signup = &transport.calls_to(SIGNUP_PATH)[0];
    assert_eq!(signup.body.as_ref().unwrap()["email"], "ada@example.com");
    assert_eq!(transport.count(LOGIN_PATH), 1);
}

#[tokio::test]
async fn duplicate_signup_is_reported() {
    let transport = Arc::new(backend());
    let (_, tokens) = token_store(None);
    let auth = RealAuthService::new(transport.clone(), tokens.clone());

    let result = auth
        .signup(SignupInput {
            username: "taken".into(),
            email: "t@example.com".into(),
            password: "hunter2".into(),
            full_name: None,
        })
        .await;

    assert!(matches!(result, Err(AuthError::UserExists)));
    assert_eq!(transport.count(LOGIN_PATH), 0);
    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn logout_revokes_and_clears() {
    let transport = Arc::new(backend());
    let (storage, tokens) = token_store(Some(pair("a1", "r1")));
    let mut events = tokens.subscribe();
    let auth = RealAuthService::new(transport.clone(), tokens.clone());

    auth.logout().await.unwrap();

    let call = &transport.calls_to(LOGOUT_PATH)[0];
    assert_eq!(call.body, Some(json!({ "refresh_token": "r1" })));
    assert!(!tokens.is_authenticated());
    assert_eq!(storage.load(REFRESH_TOKEN_KEY).unwrap(), None);
    assert_eq!(events.try_recv().unwrap(), TokenEvent::Cleared);
}

#[tokio::test]
async fn logout_clears_even_when_the_server_is_unreachable() {
    let transport = Arc::new(ScriptedTransport::new(|_, _| {
        Err(TransportError::Network("offline".into()))
    }));
    let (_, tokens) = token_store(Some(pair("a1", "r1")));
    let auth = RealAuthService::new(transport, tokens.clone());

    auth.logout().await.unwrap();

    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn logout_without_tokens_is_not_logged_in() {
    let transport = Arc::new(backend());
    let (_, tokens) = token_store(None);
    let auth = RealAuthService::new(transport.clone(), tokens);

    let result = auth.logout().await;

    assert!(matches!(result, Err(AuthError::NotLoggedIn)));
    assert!(transport.calls().is_empty());
}
