use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthError, AuthGate, JwtVerifier, TokenVerifier};
use crate::config::AppConfig;
use crate::database::ProjectStore;
use crate::handlers;
use crate::project::{ImagePolicy, ProjectService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<ProjectService>,
    pub auth: AuthGate,
    pub store: Arc<dyn ProjectStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ProjectStore>) -> Result<Self, AuthError> {
        let verifier = JwtVerifier::new(&config.security.jwt_secret)?;
        Ok(Self::with_verifier(config, store, Arc::new(verifier)))
    }

    pub fn with_verifier(
        config: AppConfig,
        store: Arc<dyn ProjectStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let images = ImagePolicy::new(config.upload.max_image_bytes);
        Self {
            projects: Arc::new(ProjectService::new(store.clone(), images)),
            auth: AuthGate::new(verifier),
            store,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(project_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn project_routes() -> Router<AppState> {
    use handlers::projects;

    Router::new()
        .route(
            "/api/projects",
            get(projects::projects_list).post(projects::projects_create),
        )
        .route(
            "/api/projects/:id",
            get(projects::project_show)
                .put(projects::project_update)
                .delete(projects::project_delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::database::MemoryProjectStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";
    const BOUNDARY: &str = "folio-test-boundary";

    fn test_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "STORE_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
    }

    fn setup() -> (Arc<MemoryProjectStore>, Router) {
        let store = Arc::new(MemoryProjectStore::new());
        let state = AppState::new(test_config(), store.clone()).unwrap();
        (store, build_router(state))
    }

    fn bearer() -> String {
        let token = generate_jwt(SECRET, &Claims::new("admin", 1).unwrap()).unwrap();
        format!("Bearer {token}")
    }

    fn json_request(method: Method, uri: &str, body: Value, auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_project() -> Value {
        json!({
            "title": "Folio",
            "description": "Portfolio backend service",
            "tech": ["rust", "axum"]
        })
    }

    #[tokio::test]
    async fn create_without_token_is_401_and_touches_nothing() {
        let (store, app) = setup();

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/projects", valid_project(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/projects",
                valid_project(),
                Some("Bearer forged".to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid or expired token");

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_returns_201_with_camel_case_body() {
        let (_, app) = setup();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/projects",
                json!({
                    "title": "Folio",
                    "description": "Portfolio backend service",
                    "githubUrl": "https://github.com/example/folio"
                }),
                Some(bearer()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["githubUrl"], "https://github.com/example/folio");
        assert_eq!(body["demoUrl"], "");
        assert_eq!(body["featured"], false);
        assert_eq!(body["order"], 0);
        assert!(body["createdAt"].is_string());
        assert!(body.get("coverImage").is_none());
    }

    #[tokio::test]
    async fn invalid_create_lists_field_errors() {
        let (store, app) = setup();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/projects",
                json!({ "title": "x", "githubUrl": "not a url" }),
                Some(bearer()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"githubUrl"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn multipart_text_file_is_rejected() {
        let (store, app) = setup();
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nFolio\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nPortfolio backend service\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhello\r\n\
             --{b}--\r\n",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/projects")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .header(AUTHORIZATION, bearer())
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errors"][0]["field"], "image");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unsupported_content_type_is_400() {
        let (_, app) = setup();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/projects")
            .header(CONTENT_TYPE, "text/plain")
            .header(AUTHORIZATION, bearer())
            .body(Body::from("title=Folio"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "body");
        assert!(body["message"].as_str().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn unreadable_query_is_a_json_400() {
        let (_, app) = setup();
        let response = app.oneshot(get("/api/projects?q=a&q=b")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "query");
    }

    #[tokio::test]
    async fn undecodable_path_id_is_a_json_400() {
        let (_, app) = setup();
        let response = app.oneshot(get("/api/projects/%FF")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errors"][0]["field"], "id");
    }

    #[tokio::test]
    async fn malformed_id_is_400_and_unknown_id_is_404() {
        let (_, app) = setup();

        let response = app.clone().oneshot(get("/api/projects/not-an-id")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errors"][0]["field"], "id");

        let missing = crate::types::ProjectId::generate();
        let response = app
            .oneshot(get(&format!("/api/projects/{missing}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let (_, app) = setup();

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/projects", valid_project(), Some(bearer())))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/projects/{id}"))
            .header(AUTHORIZATION, bearer())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], id.as_str());

        let response = app.oneshot(get(&format!("/api/projects/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let (_, app) = setup();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["store"], "memory");
    }
}
