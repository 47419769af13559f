use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::films;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoint (no auth)
        .route("/health", get(health::health_check))
        // Registration and login (no auth)
        .merge(auth::create_auth_router())
        // Film catalog (bearer token)
        .merge(films::create_films_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::auth::{JwtConfig, JwtService};

    fn app() -> Router {
        let tokens = Arc::new(JwtService::new(JwtConfig::new("router-test-secret")).unwrap());
        create_router_with_state(crate::create_in_memory_state(tokens))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_and_login(app: &Router, username: &str) -> String {
        let credentials = json!({"username": username, "password": "Secret1!"});

        let response = send(app, Method::POST, "/register", None, Some(credentials.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(app, Method::POST, "/login", None, Some(credentials)).await;
        assert_eq!(response.status(), StatusCode::OK);

        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    async fn create_matrix(app: &Router, token: &str) -> i64 {
        let response = send(
            app,
            Method::POST,
            "/films",
            Some(token),
            Some(json!({
                "title": "Matrix",
                "director": "Wachowski",
                "release_date": "1999-03-31",
                "genre": "Sci-Fi"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        body_json(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), Method::GET, "/health", None, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = app();
        let credentials = json!({"username": "alice", "password": "Secret1!"});

        let response = send(&app, Method::POST, "/register", None, Some(credentials.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["message"], "user registered successfully");

        let response = send(&app, Method::POST, "/login", None, Some(credentials)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(chrono::DateTime::parse_from_rfc3339(body["expires_at"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let app = app();

        let bad_username = json!({"username": "1alice", "password": "Secret1!"});
        let response = send(&app, Method::POST, "/register", None, Some(bad_username)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bad_password = json!({"username": "alice", "password": "abc"});
        let response = send(&app, Method::POST, "/register", None, Some(bad_password)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        register_and_login(&app, "alice").await;

        let again = json!({"username": "alice", "password": "Other12!"});
        let response = send(&app, Method::POST, "/register", None, Some(again)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["message"], "username already taken");
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let app = app();
        register_and_login(&app, "alice").await;

        let wrong = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "alice", "password": "Wrong1!!"})),
        )
        .await;
        let unknown = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "mallory", "password": "Secret1!"})),
        )
        .await;

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await, body_json(unknown).await);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"username\":"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_films_require_token() {
        let app = app();

        let response = send(&app, Method::GET, "/films", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, Method::GET, "/films", Some("not-a-jwt"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_ownership_scenario() {
        let app = app();
        let alice = register_and_login(&app, "alice").await;
        let bob = register_and_login(&app, "bob").await;
        let id = create_matrix(&app, &alice).await;
        let uri = format!("/films/{}", id);

        let response = send(&app, Method::PUT, &uri, Some(&bob), Some(json!({"title": "X"}))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app,
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({"genre": "Action"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let film = body_json(response).await;
        assert_eq!(film["title"], "Matrix");
        assert_eq!(film["genre"], "Action");
        assert_eq!(film["director"], "Wachowski");
        assert_eq!(film["release_date"], "1999-03-31");

        let response = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_film_details_embed_owner() {
        let app = app();
        let alice = register_and_login(&app, "alice").await;
        let bob = register_and_login(&app, "bob").await;
        let id = create_matrix(&app, &alice).await;

        let response = send(&app, Method::GET, &format!("/films/{}", id), Some(&bob), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let film = body_json(response).await;
        assert_eq!(film["title"], "Matrix");
        assert_eq!(film["owner"]["username"], "alice");
        assert!(film["owner"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_film_errors() {
        let app = app();
        let alice = register_and_login(&app, "alice").await;
        create_matrix(&app, &alice).await;

        let response = send(
            &app,
            Method::POST,
            "/films",
            Some(&alice),
            Some(json!({"title": ""})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/films",
            Some(&alice),
            Some(json!({"title": "Matrix"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            Method::POST,
            "/films",
            Some(&alice),
            Some(json!({"title": "Alien", "release_date": "31/05/1979"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_films_with_filters() {
        let app = app();
        let alice = register_and_login(&app, "alice").await;
        create_matrix(&app, &alice).await;
        send(
            &app,
            Method::POST,
            "/films",
            Some(&alice),
            Some(json!({"title": "Alien", "genre": "Horror"})),
        )
        .await;

        let response = send(&app, Method::GET, "/films", Some(&alice), None).await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

        let response = send(&app, Method::GET, "/films?genre=Horror", Some(&alice), None).await;
        let films = body_json(response).await;
        assert_eq!(films.as_array().unwrap().len(), 1);
        assert_eq!(films[0]["title"], "Alien");
        assert!(films[0]["release_date"].is_null());

        let response = send(
            &app,
            Method::GET,
            "/films?release_date=1999-03-31",
            Some(&alice),
            None,
        )
        .await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = send(
            &app,
            Method::GET,
            "/films?release_date=invalid-date",
            Some(&alice),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_and_missing_ids() {
        let app = app();
        let alice = register_and_login(&app, "alice").await;

        let response = send(&app, Method::GET, "/films/abc", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::PUT,
            "/films/42",
            Some(&alice),
            Some(json!({"title": "X"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, "/films/42", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/films/0", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/films/-1", Some(&alice), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
