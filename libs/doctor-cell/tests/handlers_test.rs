use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::doctor_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

struct TestApp {
    router: Router,
    bearer: String,
}

impl TestApp {
    fn new() -> Self {
        let config = TestConfig::default();
        let router = Router::new().nest("/medicos", doctor_routes(config.to_state()));
        Self {
            router,
            bearer: JwtTestUtils::admin_bearer(&config),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_as(Some(&self.bearer), method, uri, body).await
    }

    async fn send_as(&self, bearer: Option<&str>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            builder = builder.header("authorization", bearer);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn create_doctor(&self, cpf: &str, crm: &str) -> String {
        let (status, body) = self
            .send("POST", "/medicos", Some(json!({
                "nome": "Dr. X", "cpf": cpf, "crm": crm, "especialidade": "Y"
            })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_doctor_lifecycle() {
    let app = TestApp::new();
    let id = app.create_doctor("1", "2").await;

    let (status, body) = app.send("GET", &format!("/medicos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medico"]["_id"], json!(id));
    assert_eq!(body["medico"]["nome"], "Dr. X");
    assert_eq!(body["medico"]["cpf"], "1");
    assert_eq!(body["medico"]["crm"], "2");
    assert_eq!(body["medico"]["especialidade"], "Y");

    let (status, body) = app.send("GET", "/medicos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medicos"].as_array().unwrap().len(), 1);

    let (status, _) = app.send("DELETE", &format!("/medicos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", &format!("/medicos/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_duplicate_cpf_or_crm_is_rejected() {
    let app = TestApp::new();
    app.create_doctor("1", "2").await;

    let (status, body) = app
        .send("POST", "/medicos", Some(json!({
            "nome": "Dr. Z", "cpf": "1", "crm": "3", "especialidade": "Y"
        })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("CPF"));

    let (status, _) = app
        .send("POST", "/medicos", Some(json!({
            "nome": "Dr. Z", "cpf": "4", "crm": "2", "especialidade": "Y"
        })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.send("GET", "/medicos", None).await;
    assert_eq!(body["medicos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_field_and_invalid_id() {
    let app = TestApp::new();

    let (status, body) = app
        .send("POST", "/medicos", Some(json!({"nome": "Dr. X", "cpf": "1", "crm": "2"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'especialidade' is required");

    for (method, uri) in [
        ("GET", "/medicos/not-an-id"),
        ("DELETE", "/medicos/not-an-id"),
        ("GET", "/medicos/not-an-id/horarios"),
    ] {
        let (status, body) = app.send(method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["error"], "Invalid ID");
    }

    let (status, _) = app.send("GET", "/medicos", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update() {
    let app = TestApp::new();
    let id = app.create_doctor("1", "2").await;
    let uri = format!("/medicos/{}", id);

    let (status, _) = app.send("PUT", &uri, Some(json!({"especialidade": "Pediatria"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send("GET", &uri, None).await;
    assert_eq!(body["medico"]["especialidade"], "Pediatria");
    assert_eq!(body["medico"]["nome"], "Dr. X");

    let (status, _) = app.send("PUT", &uri, Some(json!({"idade": 40}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_update_leaves_siblings() {
    let app = TestApp::new();
    let id = app.create_doctor("1", "2").await;
    let uri = format!("/medicos/{}/horarios", id);

    let (status, _) = app
        .send("POST", &uri, Some(json!({
            "2024-12-25": {
                "09:00": {"status": "disponivel"},
                "10:00": {"status": "disponivel"}
            }
        })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send("PUT", &uri, Some(json!({
            "data": "2024-12-25",
            "hora": "09:00",
            "info": {"status": "reservado", "paciente_id": "p1"}
        })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["horarios"]["2024-12-25"]["09:00"], json!({"status": "reservado", "paciente_id": "p1"}));
    assert_eq!(body["horarios"]["2024-12-25"]["10:00"], json!({"status": "disponivel"}));
}

#[tokio::test]
async fn test_delete_by_date_or_by_time() {
    let app = TestApp::new();
    let id = app.create_doctor("1", "2").await;
    let uri = format!("/medicos/{}/horarios", id);

    app.send("POST", &uri, Some(json!({
        "2024-12-25": {
            "09:00": {"status": "disponivel"},
            "10:00": {"status": "bloqueado"}
        },
        "2024-12-26": {"09:00": {"status": "disponivel"}}
    })))
    .await;

    let (status, _) = app.send("DELETE", &uri, Some(json!({"data": "2024-12-25", "hora": "09:00"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.send("GET", &uri, None).await;
    assert!(body["horarios"]["2024-12-25"].get("09:00").is_none());
    assert_eq!(body["horarios"]["2024-12-25"]["10:00"]["status"], "bloqueado");

    let (status, _) = app.send("DELETE", &uri, Some(json!({"data": "2024-12-25"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.send("GET", &uri, None).await;
    assert!(body["horarios"].get("2024-12-25").is_none());
    assert!(body["horarios"].get("2024-12-26").is_some());

    let (status, _) = app.send("DELETE", &uri, Some(json!({"hora": "09:00"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_slot_payloads_are_rejected() {
    let app = TestApp::new();
    let id = app.create_doctor("1", "2").await;
    let uri = format!("/medicos/{}/horarios", id);

    let (status, _) = app.send("POST", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("POST", &uri, Some(json!({"2024-12-25": {"09:00": {"status": "livre"}}})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("PUT", &uri, Some(json!({"data": "25/12/2024", "hora": "09:00", "info": {"status": "disponivel"}})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ghost = format!("/medicos/{}/horarios", "0123456789abcdef01234567");
    let (status, _) = app
        .send("PUT", &ghost, Some(json!({"data": "2024-12-25", "hora": "09:00", "info": {"status": "disponivel"}})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_routes_require_admin_token() {
    let app = TestApp::new();
    let config = TestConfig::default();

    let (status, _) = app.send_as(None, "GET", "/medicos", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = format!("Bearer {}", JwtTestUtils::create_expired_token(&TestUser::admin("admin"), &config.jwt_secret));
    let (status, _) = app.send_as(Some(&expired), "GET", "/medicos", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let regular = format!(
        "Bearer {}",
        JwtTestUtils::create_test_token(&TestUser::regular("ana"), &config.jwt_secret, None)
    );
    let (status, body) = app.send_as(Some(&regular), "GET", "/medicos", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Administrator access required");
}
