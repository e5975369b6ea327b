//! End-to-end tests for the declaration routes using the layout renderer.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use passport_declaration_server::configure;
use serde_json::Value;
use tempfile::tempdir;

macro_rules! init_app {
    ($dir:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(common::layout_state($dir)))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_submit_then_download_returns_pdf() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(common::sample_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let pdf_file = body["pdf_file"].as_str().unwrap().to_string();
    assert!(pdf_file.starts_with("passport_E123_"));
    assert!(pdf_file.ends_with(".pdf"));
    assert_eq!(body["download_url"], format!("/download/{}", pdf_file));
    assert_eq!(body["view_url"], format!("/view/{}", pdf_file));
    assert_eq!(body["strategy"], "layout");
    assert_eq!(body["data"]["employeeCode"], "E123");
    assert_eq!(body["data"]["passportNumber"], "Z1234567");
    assert!(dir.path().join(&pdf_file).is_file());

    let req = test::TestRequest::get()
        .uri(body["download_url"].as_str().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type.to_str().unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("passport_declaration_"));

    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_view_serves_inline() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(common::sample_payload())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(body["view_url"].as_str().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("inline"));

    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_repeated_downloads_are_identical() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(common::sample_payload())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let url = body["download_url"].as_str().unwrap().to_string();

    let first = test::call_and_read_body(&app, test::TestRequest::get().uri(&url).to_request()).await;
    let second = test::call_and_read_body(&app, test::TestRequest::get().uri(&url).to_request()).await;

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_same_employee_code_never_overwrites() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let mut names = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/passport")
            .set_json(common::sample_payload())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        names.push(body["pdf_file"].as_str().unwrap().to_string());
    }

    assert_ne!(names[0], names[1]);
    assert_eq!(common::file_count(dir.path()), 2);
}

#[actix_web::test]
async fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    for uri in ["/download/missing.pdf", "/view/missing.pdf"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NotFound");
    }
}

#[actix_web::test]
async fn test_missing_field_is_rejected_without_writing() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    for field in ["employeeCode", "signature", "issueDate"] {
        let mut payload = common::sample_payload();
        payload.as_object_mut().unwrap().remove(field);

        let req = test::TestRequest::post()
            .uri("/api/passport")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "BadRequest");
        assert!(body["message"].as_str().unwrap().contains(field));
    }

    assert_eq!(common::file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_empty_field_is_rejected_without_writing() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let mut payload = common::sample_payload();
    payload["nationality"] = Value::String("  ".to_string());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("[nationality]"));
    assert_eq!(common::file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_mistyped_field_is_rejected() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let mut payload = common::sample_payload();
    payload["passportNumber"] = Value::from(12345);

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_bad_signature_is_server_error_without_writing() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let mut payload = common::sample_payload();
    payload["signature"] = Value::String("not-a-data-uri".to_string());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InternalServerError");
    assert!(body["message"].as_str().unwrap().contains("invalid signature"));
    assert_eq!(common::file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_long_employee_code_is_stored_and_served() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let mut payload = common::sample_payload();
    payload["employeeCode"] = Value::String("E".repeat(240));

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["employeeCode"].as_str().unwrap().len(), 240);

    let req = test::TestRequest::get()
        .uri(body["download_url"].as_str().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/passport")
        .insert_header(header::ContentType::json())
        .set_payload("{ malformed json ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid passport declaration"));
    assert_eq!(common::file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_health() {
    let dir = tempdir().unwrap();
    let app = init_app!(dir.path());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}
