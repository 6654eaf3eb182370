#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use mockito::{Matcher, Mock, Server, ServerGuard};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use solarwatch::auth::seed::seed_accounts;
use solarwatch::common::AppState;
use solarwatch::config::Config;
use solarwatch::routes::build_router;
use solarwatch::services::{Capabilities, CityNameNormalizer};
use solarwatch::upstream::{GeoClient, SolarClient, TimeZoneClient};

pub const LONDON_GEO: &str =
    r#"[{"name":"London","lat":51.5073219,"lon":-0.1276474,"country":"GB"}]"#;
pub const LONDON_TZ: &str = r#"{"status":"OK","message":"","countryCode":"GB","countryName":"United Kingdom","zoneName":"Europe/London","gmtOffset":0}"#;
pub const STOCKHOLM_GEO: &str =
    r#"[{"name":"Stockholm","lat":59.3251172,"lon":18.0710935,"country":"SE"}]"#;
pub const STOCKHOLM_TZ: &str = r#"{"status":"OK","message":"","countryCode":"SE","countryName":"Sweden","zoneName":"Europe/Stockholm","gmtOffset":3600}"#;
pub const STOCKHOLM_SOLAR: &str = r#"{"results":{"sunrise":"8:35:12 AM","sunset":"3:14:40 PM","solar_noon":"11:54:56 AM","day_length":"6:39:28"},"status":"OK"}"#;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub server: ServerGuard,
}

/// Router over an in-memory database, with every upstream API pointed at a
/// mockito server. The default admin and the test user are seeded.
pub async fn test_app() -> TestApp {
    let server = Server::new_async().await;

    let config = Config {
        geo_base_url: server.url(),
        geo_api_key: "geo-key".to_string(),
        timezone_base_url: server.url(),
        timezone_api_key: "tz-key".to_string(),
        solar_base_url: server.url(),
        seed_test_user: true,
        ..Config::default()
    };

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    seed_accounts(&db, &config)
        .await
        .expect("Failed to seed accounts");

    let http_client = reqwest::Client::new();
    let apis = Capabilities {
        geo: Arc::new(GeoClient::new(http_client.clone(), &config)),
        time_zone: Arc::new(TimeZoneClient::new(http_client.clone(), &config)),
        solar: Some(Arc::new(SolarClient::new(http_client, &config))),
    };

    let state = AppState::new(db, config, CityNameNormalizer::default(), apis);
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        server,
    }
}

impl TestApp {
    pub async fn mock_geo(&mut self, city: &str, body: &str, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", "/geo/1.0/direct")
            .match_query(Matcher::UrlEncoded("q".into(), city.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create_async()
            .await
    }

    pub async fn mock_time_zone(&mut self, latitude: &str, body: &str, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", "/v2.1/get-time-zone")
            .match_query(Matcher::UrlEncoded("lat".into(), latitude.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create_async()
            .await
    }

    pub async fn mock_solar(&mut self, date: &str, body: &str, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", "/json")
            .match_query(Matcher::UrlEncoded("date".into(), date.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create_async()
            .await
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, headers, body)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (status, _, body) = self.send(builder.body(Body::empty()).unwrap()).await;
        (status, body)
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        payload: Value,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(payload.to_string())).unwrap())
            .await
    }

    /// Log in and return the `Authorization=<token>` pair for the `Cookie` header.
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let (status, headers, _) = self
            .send_json(
                "POST",
                "/api/Auth/login",
                None,
                json!({ "emailOrUserName": identifier, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed for {identifier}");

        headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|cookie| cookie.split(';').next())
            .expect("login sets the session cookie")
            .to_string()
    }

    pub async fn login_user(&self) -> String {
        self.login("test", "test123").await
    }

    pub async fn login_admin(&self) -> String {
        self.login("admin@admin.com", "admin123").await
    }
}
