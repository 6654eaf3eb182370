pub mod auth;
pub mod health;
pub mod location;
pub mod solar;
pub mod users;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, patch, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity::users::Role;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        location::get_location,
        location::get_all_locations,
        location::update_location,
        location::delete_location,
        solar::get_solar_data,
        solar::get_all_solar_data,
        solar::update_solar_data,
        solar::delete_solar_data,
        auth::register,
        auth::login,
        auth::whoami,
        auth::logout,
        users::get_all_users,
        users::get_by_user_data,
        users::get_user_by_id,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            location::CityResponse,
            location::UpdateLocationRequest,
            solar::SolarDataResponse,
            solar::UpdateSolarDataRequest,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::WhoAmIResponse,
            users::UserResponse,
            users::UpdateUserRequest,
            Role,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "location", description = "City coordinates, timezone and country"),
        (name = "solar", description = "Sunrise and sunset times"),
        (name = "auth", description = "Registration, login and sessions"),
        (name = "users", description = "Account management"),
    ),
    info(
        title = "SolarWatch API",
        description = "Sunrise and sunset times for any city, cached per city and date",
        version = "0.1.0"
    )
)]
struct ApiDoc;

/// Explicit origins allow credentials (the session cookie); without any, every
/// origin is allowed and cookies are not.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    tracing::info!(
        cors_origins = ?config.cors_allowed_origins,
        "Building router"
    );

    let location_routes = Router::new()
        .route("/getlocation/{city}", get(location::get_location))
        .route("/getall", get(location::get_all_locations))
        .route("/update/{id}", patch(location::update_location))
        .route("/delete/{id}", delete(location::delete_location));

    let solar_routes = Router::new()
        .route("/getdata/{city}/{date}", get(solar::get_solar_data))
        .route("/getall", get(solar::get_all_solar_data))
        .route("/update/{id}", patch(solar::update_solar_data))
        .route("/delete/{id}", delete(solar::delete_solar_data));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/whoami", get(auth::whoami))
        .route("/logout", post(auth::logout));

    let user_routes = Router::new()
        .route("/getall", get(users::get_all_users))
        .route(
            "/getbyuserdata/{emailOrUserName}",
            get(users::get_by_user_data),
        )
        .route("/getbyid/{id}", get(users::get_user_by_id))
        .route("/update/{id}", patch(users::update_user))
        .route("/delete/{id}", delete(users::delete_user));

    let api_routes = Router::new()
        .nest("/Location", location_routes)
        .nest("/SW", solar_routes)
        .nest("/Auth", auth_routes)
        .nest("/User", user_routes)
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (no authentication)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors = cors_layer(&config.cors_allowed_origins);

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
