use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use patient_cell::patient_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn app() -> (Router, String) {
    let config = TestConfig::default();
    let router = Router::new().nest("/pacientes", patient_routes(config.to_state()));
    (router, JwtTestUtils::admin_bearer(&config))
}

async fn send(app: &Router, bearer: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create_patient(app: &Router, bearer: &str) -> String {
    let (status, body) = send(app, bearer, "POST", "/pacientes", Some(json!({
        "nome": "Ana", "cpf": "111", "celular": "11999", "idade": 30
    })))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_patient_lifecycle() {
    let (app, bearer) = app();
    let id = create_patient(&app, &bearer).await;
    let uri = format!("/pacientes/{}", id);

    let (status, body) = send(&app, &bearer, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paciente"]["nome"], "Ana");
    assert_eq!(body["paciente"]["idade"], 30);
    assert_eq!(body["paciente"]["consultas"], json!({}));

    let (status, _) = send(&app, &bearer, "PUT", &uri, Some(json!({"celular": "11888"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, &bearer, "GET", "/pacientes", None).await;
    assert_eq!(body["pacientes"][0]["celular"], "11888");

    let (status, _) = send(&app, &bearer, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, &bearer, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, &bearer, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_all_fields() {
    let (app, bearer) = app();

    let (status, body) = send(&app, &bearer, "POST", "/pacientes", Some(json!({
        "nome": "Ana", "cpf": "111", "idade": 30
    })))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'celular' is required");

    let (status, body) = send(&app, &bearer, "PUT", "/pacientes/123", Some(json!({"nome": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID");

    let (status, body) = send(&app, &bearer, "GET", "/pacientes/123/consultas", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID");
}

#[tokio::test]
async fn test_appointments_point_update_and_delete() {
    let (app, bearer) = app();
    let id = create_patient(&app, &bearer).await;
    let uri = format!("/pacientes/{}/consultas", id);

    let (status, _) = send(&app, &bearer, "POST", &uri, Some(json!({
        "2025-01-10": {
            "09:00": {"status": "agendada", "medico_id": "m1"},
            "14:00": {"status": "confirmada"}
        }
    })))
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, &bearer, "PUT", &uri, Some(json!({
        "data": "2025-01-10",
        "hora": "09:00",
        "detalhes": {"status": "realizada", "observacoes": "retorno em 30 dias"}
    })))
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, &bearer, "GET", &uri, None).await;
    assert_eq!(body["consultas"]["2025-01-10"]["09:00"]["status"], "realizada");
    assert_eq!(body["consultas"]["2025-01-10"]["14:00"]["status"], "confirmada");

    let (status, _) = send(&app, &bearer, "DELETE", &uri, Some(json!({"data": "2025-01-10", "hora": "14:00"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, &bearer, "GET", &uri, None).await;
    assert!(body["consultas"]["2025-01-10"].get("14:00").is_none());
    assert!(body["consultas"]["2025-01-10"].get("09:00").is_some());

    let (status, _) = send(&app, &bearer, "DELETE", &uri, Some(json!({"data": "2025-01-10"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, &bearer, "GET", &uri, None).await;
    assert_eq!(body["consultas"], json!({}));
}

#[tokio::test]
async fn test_appointment_update_requires_details() {
    let (app, bearer) = app();
    let id = create_patient(&app, &bearer).await;
    let uri = format!("/pacientes/{}/consultas", id);

    let (status, body) = send(&app, &bearer, "PUT", &uri, Some(json!({"data": "2025-01-10", "hora": "09:00"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fields 'data', 'hora' and 'detalhes' are required");
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let (app, _) = app();
    let config = TestConfig::default();
    let bearer = format!(
        "Bearer {}",
        JwtTestUtils::create_test_token(&TestUser::regular("ana"), &config.jwt_secret, None)
    );

    let (status, _) = send(&app, &bearer, "GET", "/pacientes", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let forged = format!("Bearer {}", JwtTestUtils::create_invalid_signature_token(&TestUser::admin("admin")));
    let (status, _) = send(&app, &forged, "GET", "/pacientes", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
