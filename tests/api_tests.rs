use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_payload_requires_json() {
    let app = create_test_app();

    // Sin content-type JSON el extractor rechaza la request
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservation")
                .body(Body::from("start_date=2025-11-10"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_payload_shape() {
    let app = create_test_app();

    let payload = json!({
        "vehicle_id": "0b5ecdb6-6a74-4f0a-8c3b-0a2f2b3c4d5e",
        "start_date": "2025-11-10",
        "end_date": "2025-11-12",
        "renter_name": "Jean Dupont",
        "renter_email": "jean@example.com",
        "renter_phone": "0612345678"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservation")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// Función helper para crear la app de test
fn create_test_app() -> axum::Router {
    // App de test básica con la forma de las rutas reales
    axum::Router::new()
        .route("/test", axum::routing::get(|| async { "OK" }))
        .route(
            "/api/reservation",
            axum::routing::post(|body: axum::Json<serde_json::Value>| async move {
                // La request debe traer el payload conceptual de booking completo
                let required = ["vehicle_id", "start_date", "end_date", "renter_email"];
                if required.iter().all(|f| body.0.get(f).is_some()) {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                }
            }),
        )
}
