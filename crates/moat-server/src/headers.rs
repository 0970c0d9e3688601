//! Response headers added to every preview response.

use axum::http::header::{CACHE_CONTROL, HeaderName, X_CONTENT_TYPE_OPTIONS};
use axum::http::HeaderValue;
use tower_http::set_header::SetResponseHeaderLayer;

/// Revalidate on every request so rebuilt pages show up on reload.
pub(crate) fn no_cache_layer() -> SetResponseHeaderLayer<HeaderValue> {
    header_layer(CACHE_CONTROL, "no-cache")
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    header_layer(X_CONTENT_TYPE_OPTIONS, "nosniff")
}

fn header_layer(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
