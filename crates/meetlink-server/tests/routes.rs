#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;

use tempfile::TempDir;
use url::Url;
use warp::http::StatusCode;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meetlink_auth::{ClientCredentials, FileTokenStore, TokenRecord, TokenStore};
use meetlink_core::ServerConfig;
use meetlink_server::{routes, AppState};

const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

struct Harness {
    _dir: TempDir,
    store: FileTokenStore,
    state: AppState,
}

fn harness(upstream: &MockServer, auto_create: bool) -> Harness {
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token.json");

    let config = ServerConfig {
        token_path: token_path.clone(),
        calendar_api_base: upstream.uri(),
        auto_create,
        open_browser: false,
        ..ServerConfig::default()
    };
    let credentials = ClientCredentials {
        client_id: "test_client_id".to_string(),
        client_secret: "test_client_secret".to_string(),
        redirect_uri: "http://localhost:3000/oauth2callback".to_string(),
        auth_uri: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
        token_uri: format!("{}/token", upstream.uri()),
    };

    Harness {
        _dir: dir,
        store: FileTokenStore::new(token_path),
        state: AppState::new(config, credentials).unwrap(),
    }
}

fn token() -> TokenRecord {
    TokenRecord {
        access_token: "ya29.stored".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        expiry: None,
        scope: CALENDAR_SCOPE.to_string(),
        token_type: "Bearer".to_string(),
    }
}

fn created_event(with_link: bool) -> serde_json::Value {
    let conference = if with_link {
        serde_json::json!({
            "entryPoints": [
                { "entryPointType": "phone", "uri": "tel:+1-555-0100" },
                { "entryPointType": "video", "uri": "https://meet.google.com/abc-defg-hij" }
            ]
        })
    } else {
        serde_json::json!({
            "createRequest": { "requestId": "meet-1", "status": { "statusCode": "pending" } }
        })
    };

    serde_json::json!({
        "id": "evt123",
        "summary": "Planning",
        "start": { "dateTime": "2024-02-01T11:05:00+01:00", "timeZone": "Africa/Tunis" },
        "end": { "dateTime": "2024-02-01T11:35:00+01:00", "timeZone": "Africa/Tunis" },
        "htmlLink": "https://calendar.google.com/event?eid=evt123",
        "conferenceData": conference
    })
}

fn body(res: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    String::from_utf8_lossy(res.body()).to_string()
}

fn post_form(form: &str) -> warp::test::RequestBuilder {
    warp::test::request()
        .method("POST")
        .path("/create-event")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form.to_string())
}

#[tokio::test]
async fn signed_out_index_offers_sign_in() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);

    let res = warp::test::request().path("/").reply(&routes(h.state)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let html = body(&res);
    assert!(html.contains("Sign in with Google"));

    let start = html.find("href=\"").unwrap() + 6;
    let end = start + html[start..].find('"').unwrap();
    let href = html[start..end].replace("&amp;", "&");
    let params: HashMap<String, String> =
        Url::parse(&href).unwrap().query_pairs().into_owned().collect();

    assert_eq!(params["client_id"], "test_client_id");
    assert_eq!(params["redirect_uri"], "http://localhost:3000/oauth2callback");
    assert_eq!(params["scope"], CALENDAR_SCOPE);
    assert_eq!(params["access_type"], "offline");
    assert_eq!(params["prompt"], "consent");
}

#[tokio::test]
async fn signed_in_index_shows_form() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();

    let res = warp::test::request().path("/").reply(&routes(h.state)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body(&res);
    assert!(html.contains("action=\"/create-event\""));
    assert!(html.contains("name=\"emails\""));
}

#[tokio::test]
async fn callback_persists_token() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=good-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.fresh",
            "refresh_token": "1//refresh",
            "expires_in": 3599,
            "scope": CALENDAR_SCOPE,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    let res = warp::test::request()
        .path("/oauth2callback?code=good-code&scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("Authentication successful!"));

    let stored = h.store.read_token().unwrap().unwrap();
    assert_eq!(stored.access_token, "ya29.fresh");
    assert_eq!(stored.refresh_token.as_deref(), Some("1//refresh"));
    assert!(stored.expiry.is_some());
}

#[tokio::test]
async fn callback_without_code() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);

    let res = warp::test::request()
        .path("/oauth2callback")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body(&res).contains("No code found in query params."));
    assert!(!h.store.has_token());
}

#[tokio::test]
async fn callback_with_provider_error() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);

    let res = warp::test::request()
        .path("/oauth2callback?error=access_denied")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body(&res).contains("Sign-in was cancelled."));
    assert!(!h.store.has_token());
}

#[tokio::test]
async fn rejected_code_writes_nothing() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    let res = warp::test::request()
        .path("/oauth2callback?code=stale")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body(&res).contains("Sign-in failed."));
    assert!(!h.store.has_token());
}

#[tokio::test]
async fn create_event_shows_meet_link() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(query_param("conferenceDataVersion", "1"))
        .and(query_param("sendUpdates", "all"))
        .and(header("authorization", "Bearer ya29.stored"))
        .and(body_string_contains("\"hangoutsMeet\""))
        .and(body_string_contains("alice@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_event(true)))
        .expect(1)
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();

    let res = post_form("emails=alice%40example.com%2C+not-an-address&summary=Planning")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let html = body(&res);
    assert!(html.contains("Event Created Successfully"));
    assert!(html.contains("Planning"));
    assert!(html.contains("href=\"https://meet.google.com/abc-defg-hij\""));
    assert!(!html.contains("tel:+1-555-0100"));
}

#[tokio::test]
async fn create_event_without_video_entry() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_event(false)))
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();

    let res = post_form("emails=").reply(&routes(h.state)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("No Meet link found"));
}

#[tokio::test]
async fn create_event_escapes_returned_text() {
    let upstream = MockServer::start().await;
    let mut event = created_event(true);
    event["summary"] = serde_json::json!("<script>alert(1)</script>");
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event))
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();

    let html = body(&post_form("emails=").reply(&routes(h.state)).await);
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn create_event_when_signed_out_redirects() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);

    let res = post_form("emails=alice%40example.com")
        .reply(&routes(h.state))
        .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/");
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn expired_session_suggests_sign_out() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": 401, "message": "Invalid Credentials" }
        })))
        .mount(&upstream)
        .await;

    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();

    let res = post_form("emails=").reply(&routes(h.state)).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let html = body(&res);
    assert!(html.contains("Your session has expired."));
    assert!(html.contains("href=\"/logout\""));
    assert!(h.store.has_token());
}

#[tokio::test]
async fn auto_create_on_index() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(body_string_contains("Team Sync via Google Meet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_event(true)))
        .expect(1)
        .mount(&upstream)
        .await;

    let h = harness(&upstream, true);
    h.store.write_token(&token()).unwrap();

    let res = warp::test::request().path("/").reply(&routes(h.state)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("https://meet.google.com/abc-defg-hij"));
}

#[tokio::test]
async fn logout_forgets_token() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);
    h.store.write_token(&token()).unwrap();
    let filter = routes(h.state.clone());

    let res = warp::test::request().path("/logout").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("You have been signed out."));
    assert!(!h.store.has_token());

    let res = warp::test::request().path("/logout").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = warp::test::request().path("/").reply(&filter).await;
    assert!(body(&res).contains("Sign in with Google"));
}

#[tokio::test]
async fn corrupt_token_file() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);
    std::fs::write(h.store.path(), "{ not json").unwrap();

    let res = warp::test::request().path("/").reply(&routes(h.state)).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body(&res);
    assert!(html.contains("Saved credentials are unreadable."));
    assert!(html.contains("href=\"/logout\""));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let upstream = MockServer::start().await;
    let h = harness(&upstream, false);

    let res = warp::test::request().path("/nope").reply(&routes(h.state)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
