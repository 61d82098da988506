//! Translation of [`CorsConfig`] into a tower-http [`CorsLayer`].
//!
//! A wildcard knob combined with credentials is expressed by mirroring the
//! request: browsers reject `*` on credentialed responses and tower-http
//! refuses to build that combination.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use plugy_config::{AllowList, ConfigError, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// How long browsers may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

/// Builds the CORS layer applied to every route.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let mirror = config.allow_credentials;

    let origin = match &config.allow_origins {
        AllowList::Any if mirror => AllowOrigin::mirror_request(),
        AllowList::Any => AllowOrigin::any(),
        AllowList::List(items) => AllowOrigin::list(parse_all(items, "origin", |s| {
            HeaderValue::from_str(s).ok()
        })?),
    };

    let methods = match &config.allow_methods {
        AllowList::Any if mirror => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::any(),
        AllowList::List(items) => AllowMethods::list(parse_all(items, "method", |s| {
            Method::from_bytes(s.to_ascii_uppercase().as_bytes()).ok()
        })?),
    };

    let headers = match &config.allow_headers {
        AllowList::Any if mirror => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::any(),
        AllowList::List(items) => AllowHeaders::list(parse_all(items, "header", |s| {
            HeaderName::from_bytes(s.as_bytes()).ok()
        })?),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials)
        .max_age(PREFLIGHT_MAX_AGE))
}

fn parse_all<T>(
    items: &[String],
    kind: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ConfigError> {
    items
        .iter()
        .map(|s| {
            parse(s).ok_or_else(|| ConfigError::InvalidCorsValue {
                kind,
                value: s.clone(),
            })
        })
        .collect()
}
