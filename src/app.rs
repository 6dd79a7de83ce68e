use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, movies, starwars};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router(state.clone()))
        .merge(movies::router(state.clone()))
        .merge(starwars::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::service::ensure_admin;
    use crate::starwars::client::{FakeCatalogClient, Film};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed_request(
        method: &str,
        uri: &str,
        token: &str,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(b) => Body::from(b.to_string()),
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                serde_json::json!({"email": email, "password": password}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn empire() -> serde_json::Value {
        serde_json::json!({
            "title": "The Empire Strikes Back",
            "episode_id": 5,
            "opening_crawl": "It is a dark time for the Rebellion...",
            "director": "Irvin Kershner",
            "producer": "Gary Kurtz, Rick McCallum",
            "release_date": "1980-05-17"
        })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_then_duplicate_register() {
        let app = build_app(AppState::fake());
        let luke = serde_json::json!({
            "name": "Luke",
            "email": "luke@sw.com",
            "password": "Skywalker1"
        });

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/auth", luke.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "user created successfully");
        assert!(body["userId"].as_str().is_some());

        let resp = app
            .oneshot(json_request("POST", "/auth", luke))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["kind"], "DUPLICATE_USER");
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let app = build_app(AppState::fake());
        let resp = app
            .oneshot(json_request(
                "POST",
                "/auth",
                serde_json::json!({"name": "Luke", "email": "luke@sw.com", "password": "weak"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["kind"], "VALIDATION");
    }

    #[tokio::test]
    async fn admin_movie_lifecycle() {
        let state = AppState::fake();
        ensure_admin(state.users.as_ref(), &state.config.bootstrap_admin)
            .await
            .unwrap();
        let app = build_app(state);
        let token = login(&app, "admin@admin.com.ar", "admin123").await;

        // create
        let resp = app
            .clone()
            .oneshot(authed_request("POST", "/movies", &token, Some(empire())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let movie = body_json(resp).await;
        let movie_id = movie["id"].as_str().unwrap().to_string();
        assert_eq!(movie["episode_id"], 5);

        // duplicate natural key
        let resp = app
            .clone()
            .oneshot(authed_request("POST", "/movies", &token, Some(empire())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["kind"], "DUPLICATE_MOVIE");

        // public list
        let resp = app
            .clone()
            .oneshot(Request::get("/movies").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        // authenticated read
        let resp = app
            .clone()
            .oneshot(authed_request(
                "GET",
                &format!("/movies/{movie_id}"),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // unauthenticated read of the same route
        let resp = app
            .clone()
            .oneshot(
                Request::get(format!("/movies/{movie_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // update
        let resp = app
            .clone()
            .oneshot(authed_request(
                "PATCH",
                &format!("/movies/{movie_id}"),
                &token,
                Some(serde_json::json!({"director": "George Lucas"})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["director"], "George Lucas");

        // delete
        let resp = app
            .clone()
            .oneshot(authed_request(
                "DELETE",
                &format!("/movies/{movie_id}"),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await["message"],
            "movie deleted successfully"
        );

        let resp = app
            .oneshot(authed_request(
                "GET",
                &format!("/movies/{movie_id}"),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn regular_user_cannot_reach_admin_routes() {
        let app = build_app(AppState::fake());
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth",
                serde_json::json!({"name": "Luke", "email": "luke@sw.com", "password": "Skywalker1"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let token = login(&app, "luke@sw.com", "Skywalker1").await;

        let resp = app
            .clone()
            .oneshot(authed_request("POST", "/movies", &token, Some(empire())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .oneshot(authed_request("GET", "/auth", &token, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn login_failures_are_undifferentiated() {
        let app = build_app(AppState::fake());
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth",
                serde_json::json!({"name": "Luke", "email": "luke@sw.com", "password": "Skywalker1"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let wrong_password = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                serde_json::json!({"email": "luke@sw.com", "password": "Vader666"}),
            ))
            .await
            .unwrap();
        let unknown_email = app
            .oneshot(json_request(
                "POST",
                "/auth/login",
                serde_json::json!({"email": "leia@sw.com", "password": "Skywalker1"}),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(wrong_password).await,
            body_json(unknown_email).await
        );
    }

    #[tokio::test]
    async fn starwars_passthrough_routes() {
        let mut state = AppState::fake();
        state.catalog = Arc::new(FakeCatalogClient::with_films(vec![Film {
            title: "A New Hope".into(),
            episode_id: 4,
            opening_crawl: "...".into(),
            director: "George Lucas".into(),
            producer: "Gary Kurtz, Rick McCallum".into(),
            release_date: "1977-05-25".into(),
        }]));
        let app = build_app(state);

        let resp = app
            .clone()
            .oneshot(Request::get("/starwars/films").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        let resp = app
            .clone()
            .oneshot(
                Request::get("/starwars/films/4")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["title"], "A New Hope");

        let resp = app
            .oneshot(
                Request::get("/starwars/films/99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn catalog_outage_maps_to_bad_gateway() {
        let mut state = AppState::fake();
        state.catalog = Arc::new(FakeCatalogClient::failing());
        let app = build_app(state);

        let resp = app
            .oneshot(Request::get("/starwars/films").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(resp).await["kind"], "SYNC_FAILED");
    }
}
