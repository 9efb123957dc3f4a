use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use make_notes::config::{AppConfig, CookieConfig, JwtConfig};
use make_notes::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_days: 1,
            },
            cookie: CookieConfig {
                secure: false,
                max_age_days: 30,
            },
            frontend_url: None,
        });

        let router = make_notes::build_app(AppState::from_parts(pool.clone(), config));

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    /// Sign up a fresh user and return the auth cookie string (`token=...`).
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> String {
        let resp = self
            .post_json(
                "/api/auth/signup",
                serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                }),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        auth_cookie(&resp)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response {
        self.json_request("POST", uri, body, cookie).await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response {
        self.json_request("PUT", uri, body, cookie).await
    }

    pub async fn patch(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.bodyless_request("PATCH", uri, cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.bodyless_request("DELETE", uri, cookie).await
    }

    async fn json_request(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .uri(uri)
            .method(method)
            .header("content-type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.request(req).await
    }

    async fn bodyless_request(&self, method: &str, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }
}

/// Pull the `token=...` pair out of a response's Set-Cookie header.
pub fn auth_cookie(resp: &Response) -> String {
    resp.headers()
        .get("set-cookie")
        .expect("response should set the auth cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Read the full response body as JSON.
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
