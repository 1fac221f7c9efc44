//! Integration tests for the custody routes: upload, list, fetch, share, delete.

use std::time::Duration;

use axum::http::StatusCode;

use docvault_core::traits::ObjectPermission;
use docvault_database::FileRecordStore;

use crate::helpers::{CountingObjectStore, TestApp};

const PDF: &[u8] = b"%PDF-1.4 fake contents";

fn metadata<'a>(name: &'a str, date: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("fileName", name),
        ("docNumber", "001/HR/2024"),
        ("docType", "memo"),
        ("createdDate", date),
    ]
}

#[tokio::test]
async fn test_full_custody_lifecycle() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let uploaded = app
        .upload(
            Some(("scan.pdf", PDF)),
            &metadata("Contract", "2024-05-01"),
            Some(&token),
        )
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);
    assert_eq!(uploaded.body["success"], true);
    assert_eq!(uploaded.body["fileName"], "Contract.pdf");
    assert_eq!(
        uploaded.body["message"],
        "File 'Contract.pdf' successfully uploaded"
    );
    let file_id = uploaded.body["fileId"].as_str().unwrap().to_string();
    assert!(app.objects.inner.contains(&file_id));
    assert_eq!(
        app.objects.inner.permissions(&file_id),
        vec![ObjectPermission::AnyoneReader]
    );
    assert_eq!(app.staged_count(), 0);

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    let records = listed.body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["fileId"], file_id.as_str());
    assert_eq!(records[0]["fileName"], "Contract.pdf");
    assert_eq!(records[0]["documentNumber"], "001/HR/2024");
    assert_eq!(records[0]["documentType"], "memo");
    assert_eq!(records[0]["createdDate"], "2024-05-01");

    let downloaded = app
        .request("GET", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(downloaded.status, StatusCode::OK);
    assert_eq!(downloaded.raw, PDF);
    assert_eq!(downloaded.header("content-type"), "application/octet-stream");
    assert_eq!(
        downloaded.header("content-disposition"),
        "attachment; filename=\"Contract.pdf\""
    );

    let deleted = app
        .request("DELETE", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        deleted.body["message"],
        format!("File with ID {file_id} deleted successfully")
    );

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 0);

    let gone = app
        .request("GET", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preview_is_inline() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;
    let uploaded = app
        .upload(Some(("scan.pdf", PDF)), &metadata("", "2024-05-01"), Some(&token))
        .await;
    let file_id = uploaded.body["fileId"].as_str().unwrap().to_string();

    let preview = app
        .request(
            "GET",
            &format!("/api/files/{file_id}/preview"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(preview.status, StatusCode::OK);
    assert_eq!(preview.raw, PDF);
    assert_eq!(
        preview.header("content-disposition"),
        "inline; filename=\"scan.pdf\""
    );
}

#[tokio::test]
async fn test_upload_accepts_legacy_field_names() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let uploaded = app
        .upload(
            Some(("surat.docx", &b"docx"[..])),
            &[
                ("nomorSurat", "12/A"),
                ("jenisSurat", "undangan"),
                ("tanggalDibuat", "2023-12-31"),
            ],
            Some(&token),
        )
        .await;

    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);
    assert_eq!(uploaded.body["fileName"], "surat.docx");

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    let record = &listed.body[0];
    assert_eq!(record["documentNumber"], "12/A");
    assert_eq!(record["documentType"], "undangan");
    assert_eq!(record["createdDate"], "2023-12-31");
}

#[tokio::test]
async fn test_upload_without_token_never_reaches_object_store() {
    let app = TestApp::new().await;

    let response = app
        .upload(Some(("scan.pdf", PDF)), &metadata("X", "2024-05-01"), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.objects.calls(), 0);
    assert_eq!(app.staged_count(), 0);
}

#[tokio::test]
async fn test_upload_without_file() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let response = app
        .upload(None, &metadata("X", "2024-05-01"), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "MISSING_INPUT");
    assert_eq!(app.objects.calls(), 0);
}

#[tokio::test]
async fn test_upload_with_invalid_date_cleans_up() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let response = app
        .upload(
            Some(("scan.pdf", PDF)),
            &metadata("X", "31/12/2024"),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_DATE");
    assert_eq!(app.objects.calls(), 0);
    assert_eq!(app.staged_count(), 0);
}

#[tokio::test]
async fn test_upload_past_deadline_is_upstream_unavailable() {
    let slow = CountingObjectStore::with_create_delay(Duration::from_secs(3));
    let app = TestApp::with_deadline(1, slow).await;
    let token = app.signed_in("alice@example.com").await;

    let response = app
        .upload(
            Some(("scan.pdf", PDF)),
            &metadata("Contract", "2024-05-01"),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "UPSTREAM_UNAVAILABLE");
    assert!(response.header("content-type").starts_with("application/json"));
    assert_eq!(app.settled_staged_count().await, 0);
    assert!(app.index.find_all().await.unwrap().is_empty());
    assert!(app.objects.inner.is_empty());
}

#[tokio::test]
async fn test_upload_without_date() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let response = app
        .upload(Some(("scan.pdf", PDF)), &[("fileName", "X")], Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "MISSING_INPUT");
    assert_eq!(app.objects.calls(), 0);
}

#[tokio::test]
async fn test_list_is_shared_across_users_in_upload_order() {
    let app = TestApp::new().await;
    let alice = app.signed_in("alice@example.com").await;
    let bob = app.signed_in("bob@example.com").await;

    app.upload(Some(("a.pdf", PDF)), &metadata("First", "2024-01-01"), Some(&alice))
        .await;
    app.upload(Some(("b.pdf", PDF)), &metadata("Second", "2024-01-02"), Some(&bob))
        .await;

    let listed = app.request("GET", "/api/files", None, Some(&alice)).await;
    let names: Vec<_> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["fileName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["First.pdf", "Second.pdf"]);
}

#[tokio::test]
async fn test_share_with_explicit_recipient() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;
    let uploaded = app
        .upload(Some(("scan.pdf", PDF)), &metadata("X", "2024-05-01"), Some(&token))
        .await;
    let file_id = uploaded.body["fileId"].as_str().unwrap().to_string();

    let shared = app
        .request(
            "POST",
            &format!("/api/files/{file_id}/share"),
            Some(serde_json::json!({ "email": "carol@example.com" })),
            Some(&token),
        )
        .await;

    assert_eq!(shared.status, StatusCode::OK);
    assert_eq!(shared.body["message"], "File shared with carol@example.com");
    assert!(
        app.objects
            .inner
            .permissions(&file_id)
            .contains(&ObjectPermission::UserReader {
                email: "carol@example.com".to_string()
            })
    );
}

#[tokio::test]
async fn test_share_without_recipient() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;
    let uploaded = app
        .upload(Some(("scan.pdf", PDF)), &metadata("X", "2024-05-01"), Some(&token))
        .await;
    let file_id = uploaded.body["fileId"].as_str().unwrap().to_string();

    let shared = app
        .request(
            "POST",
            &format!("/api/files/{file_id}/share"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(shared.status, StatusCode::BAD_REQUEST);
    assert_eq!(shared.body["error"], "MISSING_INPUT");
}

#[tokio::test]
async fn test_share_falls_back_to_default_recipient() {
    let app = TestApp::with_default_recipient(Some("records@example.com")).await;
    let token = app.signed_in("alice@example.com").await;
    let uploaded = app
        .upload(Some(("scan.pdf", PDF)), &metadata("X", "2024-05-01"), Some(&token))
        .await;
    let file_id = uploaded.body["fileId"].as_str().unwrap().to_string();

    let shared = app
        .request(
            "POST",
            &format!("/api/files/{file_id}/share"),
            Some(serde_json::json!({})),
            Some(&token),
        )
        .await;

    assert_eq!(shared.status, StatusCode::OK);
    assert_eq!(shared.body["message"], "File shared with records@example.com");
}

#[tokio::test]
async fn test_unknown_file_is_not_found() {
    let app = TestApp::new().await;
    let token = app.signed_in("alice@example.com").await;

    let download = app
        .request("GET", "/api/files/missing-id", None, Some(&token))
        .await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);

    let delete = app
        .request("DELETE", "/api/files/missing-id", None, Some(&token))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}
