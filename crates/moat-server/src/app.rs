//! Router construction.

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::ServerConfig;
use crate::headers;

/// Create the preview router for a built site.
///
/// Files are served from `config.site_dir`; directory URLs serve their
/// `index.html`. With a base path, the site is mounted under it and `/`
/// redirects there.
pub fn create_router(config: &ServerConfig) -> Router {
    let files = ServeDir::new(&config.site_dir).append_index_html_on_directories(true);

    let router = if config.base_path.is_empty() {
        Router::new().fallback_service(files)
    } else {
        let redirect = Redirect::temporary(&format!("{}/", config.base_path));
        Router::new()
            .route("/", get(move || std::future::ready(redirect.clone())))
            .nest_service(&config.base_path, files)
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(headers::no_cache_layer())
            .layer(headers::content_type_options_layer()),
    )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn site() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let write = |rel: &str, content: &str| {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write("index.html", "home");
        write("guide/intro/index.html", "intro");
        write("_static/site.css", "body{}");
        temp
    }

    fn config(dir: &Path, base_path: &str) -> ServerConfig {
        ServerConfig {
            site_dir: dir.to_path_buf(),
            base_path: base_path.to_owned(),
            ..ServerConfig::default()
        }
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_root_index() {
        let temp = site();
        let (status, headers, body) = get(create_router(&config(temp.path(), "")), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "home");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_serves_directory_index() {
        let temp = site();
        let (status, _, body) = get(create_router(&config(temp.path(), "")), "/guide/intro/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "intro");
    }

    #[tokio::test]
    async fn test_serves_static_file_with_mime() {
        let temp = site();
        let (status, headers, body) = get(create_router(&config(temp.path(), "")), "/_static/site.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body{}");
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/css"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp = site();
        let (status, _, _) = get(create_router(&config(temp.path(), "")), "/nope/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_base_path_mount() {
        let temp = site();
        let router = create_router(&config(temp.path(), "/docs"));

        let (status, _, body) = get(router.clone(), "/docs/guide/intro/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "intro");

        let (status, headers, _) = get(router, "/").await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(headers[header::LOCATION], "/docs/");
    }
}
