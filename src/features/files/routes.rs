use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_file, get_file_limits, get_file_text, list_files, upload_file,
};
use crate::features::files::services::FileService;
use crate::shared::constants::MULTIPART_OVERHEAD_BYTES;

/// Protected file routes (require JWT authentication)
pub fn protected_routes(file_service: Arc<FileService>, max_file_size_bytes: u64) -> Router {
    let body_limit = usize::try_from(max_file_size_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/files", get(list_files))
        .route("/files/{id}", delete(delete_file))
        .route("/files/{id}/download", get(download_file))
        .route("/files/{id}/text", get(get_file_text))
        .with_state(file_service)
}

/// Public file routes
pub fn public_routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route("/files/limits", get(get_file_limits))
        .with_state(file_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreviewConfig;
    use crate::features::files::models::File;
    use crate::features::files::repositories::FileRepository;
    use crate::features::users::models::UserRole;
    use crate::shared::constants::PUBLIC_USER_ID;
    use crate::shared::test_helpers::{
        principal, test_storage_config, with_auth, InMemoryFileRepository, InMemoryUserRepository,
        RecordingPreviewQueue,
    };
    use axum::body::Bytes;
    use axum::http::{header, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;
    use tempfile::TempDir;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;
    const ADMIN: i64 = 3;

    struct Harness {
        _temp_dir: TempDir,
        files: Arc<InMemoryFileRepository>,
        service: Arc<FileService>,
    }

    impl Harness {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let files = Arc::new(InMemoryFileRepository::new());
            let users = Arc::new(InMemoryUserRepository::new());
            users.seed(ALICE, "alice", Some("alice@example.com"), "hash");
            users.seed(BOB, "bob", Some("bob@example.com"), "hash");
            users.seed(ADMIN, "admin", Some("admin@example.com"), "hash");

            let service = Arc::new(FileService::new(
                files.clone(),
                users,
                Arc::new(RecordingPreviewQueue::default()),
                test_storage_config(temp_dir.path()),
                &PreviewConfig { enabled: false },
            ));

            Self {
                _temp_dir: temp_dir,
                files,
                service,
            }
        }

        fn server_as(&self, user_id: i64, role: UserRole) -> TestServer {
            let username = match user_id {
                ALICE => "alice",
                BOB => "bob",
                _ => "admin",
            };
            let app = with_auth(
                protected_routes(self.service.clone(), 1024 * 1024),
                principal(user_id, username, role),
            )
            .merge(public_routes(self.service.clone()));
            TestServer::new(app).unwrap()
        }

        async fn upload_as_alice(&self, name: &str, bytes: &'static [u8]) -> File {
            self.service
                .upload_file(ALICE, name, "", None, bytes)
                .await
                .unwrap()
        }
    }

    fn file_form(name: &str, mime: &str, bytes: &'static [u8]) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes).file_name(name.to_string()).mime_type(mime.to_string()),
        )
    }

    #[tokio::test]
    async fn test_upload_returns_metadata() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server
            .post("/files/upload")
            .multipart(file_form("My File (1).pdf", "application/octet-stream", b"%PDF-1.7"))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["name"], "My File (1).pdf");
        assert_eq!(body["contentType"], "application/pdf");
        assert_eq!(body["size"], 8);
        assert_eq!(body["hasTextContent"], false);
        assert!(body["uploadDate"].is_string());
        assert!(body.get("thumbnailUrl").is_none());

        let stored = h.files.find_by_id(body["id"].as_i64().unwrap()).await.unwrap().unwrap();
        assert!(!stored.name.contains(' '));
    }

    #[tokio::test]
    async fn test_upload_without_file_part_is_bad_request() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server
            .post("/files/upload")
            .multipart(MultipartForm::new().add_text("note", "no file here"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Missing form field 'file'");
    }

    #[tokio::test]
    async fn test_upload_without_filename_is_bad_request() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server
            .post("/files/upload")
            .multipart(MultipartForm::new().add_part("file", Part::bytes(&b"data"[..])))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Filename is required");
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_payload_too_large() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);
        let oversized = vec![b'a'; 3 * 1024 * 1024];

        let response = server
            .post("/files/upload")
            .multipart(MultipartForm::new().add_part(
                "file",
                Part::bytes(oversized).file_name("big.txt").mime_type("text/plain"),
            ))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<Value>()["error"], "File too large");
        assert!(h.files.find_active_by_user_id(ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_interrupted_body_is_io_error() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);
        let truncated = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            this body ends before the closing boundary";

        let response = server
            .post("/files/upload")
            .content_type("multipart/form-data; boundary=XYZ")
            .bytes(Bytes::from_static(truncated.as_bytes()))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("I/O error:"), "{}", error);
        assert!(h.files.find_active_by_user_id(ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let h = Harness::new();
        for i in 0..25 {
            h.files.seed(ALICE, &format!("doc-{}.txt", i), 10, 100 - i);
        }
        h.files.seed(BOB, "bob.txt", 10, 0);
        let server = h.server_as(ALICE, UserRole::User);

        let response = server
            .get("/files")
            .add_query_param("page", 3)
            .add_query_param("pageSize", 10)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["total"], 25);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["page"], 3);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["hasNext"], false);
        assert_eq!(body["hasPrevious"], true);
        assert_eq!(body["files"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_page_far_past_the_end_is_empty() {
        let h = Harness::new();
        for i in 0..25 {
            h.files.seed(ALICE, &format!("doc-{}.txt", i), 10, 100 - i);
        }
        let server = h.server_as(ALICE, UserRole::User);

        let response = server
            .get("/files")
            .add_query_param("page", i64::MAX)
            .add_query_param("pageSize", 10)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["total"], 25);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["page"], i64::MAX);
        assert_eq!(body["hasNext"], false);
        assert_eq!(body["hasPrevious"], true);
        assert!(body["files"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_empty_defaults() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let body = server.get("/files").await.json::<Value>();

        assert_eq!(body["total"], 0);
        assert_eq!(body["totalPages"], 0);
        assert_eq!(body["page"], 1);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["hasNext"], false);
        assert_eq!(body["hasPrevious"], false);
    }

    #[tokio::test]
    async fn test_list_search_filters_by_name() {
        let h = Harness::new();
        h.files.seed(ALICE, "Budget 2024.xlsx", 10, 2);
        h.files.seed(ALICE, "holiday.jpg", 10, 1);
        let server = h.server_as(ALICE, UserRole::User);

        let body = server
            .get("/files")
            .add_query_param("search", "budget")
            .await
            .json::<Value>();

        assert_eq!(body["total"], 1);
        assert_eq!(body["files"][0]["name"], "Budget 2024.xlsx");
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_paging() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server.get("/files").add_query_param("page", 0).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid paging parameters");

        server
            .get("/files")
            .add_query_param("pageSize", "lots")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_streams_with_headers() {
        let h = Harness::new();
        let file = h.upload_as_alice("notes.txt", b"Hello, World!").await;
        let server = h.server_as(ALICE, UserRole::User);

        let response = server.get(&format!("/files/{}/download", file.id)).await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), b"Hello, World!");
        assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
        assert_eq!(response.header(header::CONTENT_LENGTH), "13");
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment; filename=\"notes.txt\""
        );
    }

    #[tokio::test]
    async fn test_other_users_file_is_forbidden_not_missing() {
        let h = Harness::new();
        let mut file = h.upload_as_alice("secret.txt", b"top secret").await;
        file.text_content = Some("top secret".to_string());
        h.files.put(file.clone());
        let server = h.server_as(BOB, UserRole::User);

        let download = server.get(&format!("/files/{}/download", file.id)).await;
        download.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(download.json::<Value>()["error"], "Access denied");

        server
            .get(&format!("/files/{}/text", file.id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let deleted = server.delete(&format!("/files/{}", file.id)).await;
        deleted.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            deleted.json::<Value>()["error"],
            "You don't have permission to delete this file"
        );
    }

    #[tokio::test]
    async fn test_public_owned_file_download_requires_owner_or_admin() {
        let h = Harness::new();
        let file = h.files.seed(PUBLIC_USER_ID, "shared.txt", 3, 0);

        let response = h
            .server_as(BOB, UserRole::User)
            .get(&format!("/files/{}/download", file.id))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["error"], "Access denied");
    }

    #[tokio::test]
    async fn test_admin_may_download_any_file() {
        let h = Harness::new();
        let file = h.upload_as_alice("a.txt", b"abc").await;
        let server = h.server_as(ADMIN, UserRole::Admin);

        server
            .get(&format!("/files/{}/download", file.id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let h = Harness::new();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server.get("/files/999/download").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "File not found");

        server
            .get("/files/999/text")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete("/files/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_blob_is_content_missing() {
        let h = Harness::new();
        let file = h.upload_as_alice("a.txt", b"abc").await;
        tokio::fs::remove_file(&file.storage_path).await.unwrap();
        let server = h.server_as(ALICE, UserRole::User);

        let response = server.get(&format!("/files/{}/download", file.id)).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "File content missing");
    }

    #[tokio::test]
    async fn test_text_content() {
        let h = Harness::new();
        let mut file = h.upload_as_alice("a.txt", b"abc").await;
        let server = h.server_as(ALICE, UserRole::User);

        let missing = server.get(&format!("/files/{}/text", file.id)).await;
        missing.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<Value>()["error"], "Text content not available");

        file.text_content = Some("abc".to_string());
        file.has_text_content = true;
        h.files.put(file.clone());

        let found = server.get(&format!("/files/{}/text", file.id)).await;
        found.assert_status_ok();
        assert_eq!(found.json::<Value>()["textContent"], "abc");
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let h = Harness::new();
        let file = h.upload_as_alice("a.txt", b"abc").await;
        let server = h.server_as(ALICE, UserRole::User);

        let first = server.delete(&format!("/files/{}", file.id)).await;
        first.assert_status_ok();
        let body = first.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "File deleted successfully");

        server
            .delete(&format!("/files/{}", file.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // The row survives the soft delete but is no longer listed
        assert!(h.service.get_file(file.id).await.unwrap().is_some());
        let listed = server.get("/files").await.json::<Value>();
        assert_eq!(listed["total"], 0);
    }

    #[tokio::test]
    async fn test_limits_are_public() {
        let h = Harness::new();
        let server = TestServer::new(public_routes(h.service.clone())).unwrap();

        let response = server.get("/files/limits").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["maxFileSize"], 100 * 1024 * 1024);
        assert_eq!(body["maxFileSizeMB"], 100);
        assert_eq!(body["maxStorageGB"], 1);
        assert_eq!(body["supportedFormats"][1], "pdf");
    }
}
