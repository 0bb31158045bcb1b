//! Contract tests for the contents endpoint operations of `RepoClient`.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/repos/{o}/{r}/contents/{path}` (raw) | `read_text_*`, `read_binary_*` |
//! | GET    | `/repos/{o}/{r}/contents/{path}` (json) | `content_hash_*` |
//! | PUT    | `/repos/{o}/{r}/contents/{path}` | `write_*` |
//! | GET + DELETE | `/repos/{o}/{r}/contents/{folder}` | `delete_matching_*` |

use pricesync_repo::{RepoClient, RepoConfig, RepoError, RAW_MEDIA_TYPE};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POINTER_PATH: &str = "/repos/acme/prices/contents/price-lists-json/latest-json-filename.txt";
const ARTIFACT_PATH: &str =
    "/repos/acme/prices/contents/price-lists-json/list_price_01-05-24_json_compres.gz";
const FOLDER_PATH: &str = "/repos/acme/prices/contents/price-lists-json";

fn test_client(mock_server: &MockServer, branch: &str) -> RepoClient {
    let config = RepoConfig::local_mock(&mock_server.uri(), branch).unwrap();
    RepoClient::new(config).unwrap()
}

// ── GET raw ──────────────────────────────────────────────────────────

#[tokio::test]
async fn read_text_sends_auth_branch_and_raw_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .and(query_param("ref", "dev"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Accept", RAW_MEDIA_TYPE))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("list_price_01-05-24_json_compres.gz\n"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "dev");
    let text = client.read_text("latest-json-filename.txt").await.unwrap();
    assert_eq!(text.as_deref(), Some("list_price_01-05-24_json_compres.gz\n"));
}

#[tokio::test]
async fn read_text_returns_none_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "dev");
    assert!(client.read_text("latest-json-filename.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn read_text_surfaces_other_statuses_as_remote_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "dev");
    match client.read_text("latest-json-filename.txt").await.unwrap_err() {
        RepoError::Remote { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected Remote, got: {other:?}"),
    }
}

#[tokio::test]
async fn read_binary_returns_exact_bytes() {
    let mock_server = MockServer::start().await;
    let payload: Vec<u8> = vec![0x1f, 0x8b, 0x08, 0x00, 0xff, 0x00, 0x10];

    Mock::given(method("GET"))
        .and(path(ARTIFACT_PATH))
        .and(query_param("ref", "dev"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "dev");
    let bytes = client
        .read_binary("list_price_01-05-24_json_compres.gz")
        .await
        .unwrap();
    assert_eq!(bytes, Some(payload));
}

#[tokio::test]
async fn read_binary_returns_none_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARTIFACT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "dev");
    assert!(client
        .read_binary("list_price_01-05-24_json_compres.gz")
        .await
        .unwrap()
        .is_none());
}

// ── GET json (content hash) ──────────────────────────────────────────

#[tokio::test]
async fn content_hash_extracts_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "latest-json-filename.txt",
            "path": "price-lists-json/latest-json-filename.txt",
            "sha": "95b966ae1c166bd92f8ae7d1c313e738c731dfc3",
            "type": "file",
            "encoding": "base64",
            "content": "bGlzdA=="
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let sha = client
        .get_content_hash("latest-json-filename.txt")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sha.as_str(), "95b966ae1c166bd92f8ae7d1c313e738c731dfc3");
}

#[tokio::test]
async fn content_hash_is_none_when_file_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    assert!(client
        .get_content_hash("latest-json-filename.txt")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn content_hash_failure_is_distinguished_from_absence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let err = client
        .get_content_hash("latest-json-filename.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::ContentHashLookup { .. }));
    assert_eq!(err.status(), Some(502));
}

// ── PUT ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn write_binary_creates_without_sha_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARTIFACT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(ARTIFACT_PATH))
        .and(body_json(serde_json::json!({
            "message": "Copy price list",
            "content": "H4sIAA==",
            "branch": "master"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    client
        .write_binary(
            "list_price_01-05-24_json_compres.gz",
            &[0x1f, 0x8b, 0x08, 0x00],
            "Copy price list",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn write_text_updates_with_prior_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sha": "prior-sha",
            "type": "file"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(POINTER_PATH))
        .and(body_partial_json(serde_json::json!({
            "sha": "prior-sha",
            "branch": "master",
            // base64("a.gz\n")
            "content": "YS5nego="
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    client
        .write_text("latest-json-filename.txt", "a.gz\n", "Copy latest filename")
        .await
        .unwrap();
}

#[tokio::test]
async fn write_with_stale_sha_is_a_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"sha": "old"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(POINTER_PATH))
        .respond_with(
            ResponseTemplate::new(409).set_body_string("is at newer but expected old"),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let err = client
        .write_text("latest-json-filename.txt", "x\n", "m")
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected Conflict, got: {err:?}");
}

#[tokio::test]
async fn write_aborts_without_put_when_hash_lookup_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POINTER_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let err = client
        .write_text("latest-json-filename.txt", "x\n", "m")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::ContentHashLookup { .. }));
}

// ── DELETE by suffix ─────────────────────────────────────────────────

fn folder_listing() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "latest-json-filename.txt",
            "path": "price-lists-json/latest-json-filename.txt",
            "sha": "sha-pointer",
            "type": "file"
        },
        {
            "name": "list_price_20-04-24_json_compres.gz",
            "path": "price-lists-json/list_price_20-04-24_json_compres.gz",
            "sha": "sha-stale-1",
            "type": "file"
        },
        {
            "name": "list_price_13-04-24_json_compres.gz",
            "path": "price-lists-json/list_price_13-04-24_json_compres.gz",
            "sha": "sha-stale-2",
            "type": "file"
        },
        {
            "name": "archive_json_compres.gz",
            "path": "price-lists-json/archive_json_compres.gz",
            "sha": "sha-dir",
            "type": "dir"
        }
    ])
}

#[tokio::test]
async fn delete_matching_removes_only_matching_files() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_listing()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(
            "/repos/acme/prices/contents/price-lists-json/list_price_20-04-24_json_compres.gz",
        ))
        .and(body_json(serde_json::json!({
            "message": "Delete stale artifact list_price_20-04-24_json_compres.gz",
            "sha": "sha-stale-1",
            "branch": "master"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(
            "/repos/acme/prices/contents/price-lists-json/list_price_13-04-24_json_compres.gz",
        ))
        .and(body_partial_json(serde_json::json!({"sha": "sha-stale-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let report = client.delete_matching("_json_compres.gz").await.unwrap();
    assert!(report.is_clean());
    assert_eq!(
        report.deleted,
        vec![
            "list_price_20-04-24_json_compres.gz".to_string(),
            "list_price_13-04-24_json_compres.gz".to_string()
        ]
    );
}

#[tokio::test]
async fn delete_matching_continues_past_failed_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_listing()))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(
            "/repos/acme/prices/contents/price-lists-json/list_price_20-04-24_json_compres.gz",
        ))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(
            "/repos/acme/prices/contents/price-lists-json/list_price_13-04-24_json_compres.gz",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let report = client.delete_matching("_json_compres.gz").await.unwrap();
    assert_eq!(report.deleted, vec!["list_price_13-04-24_json_compres.gz".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "list_price_20-04-24_json_compres.gz");
    assert_eq!(report.failed[0].error.status(), Some(500));
}

#[tokio::test]
async fn delete_matching_fails_when_listing_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("listing broke"))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let err = client.delete_matching("_json_compres.gz").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn delete_matching_on_missing_folder_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, "master");
    let report = client.delete_matching("_json_compres.gz").await.unwrap();
    assert!(report.deleted.is_empty());
    assert!(report.is_clean());
}

#[tokio::test]
async fn empty_folder_prefix_lists_repository_root() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/prices/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = RepoConfig::local_mock(&mock_server.uri(), "master").unwrap();
    config.folder_prefix = String::new();
    let client = RepoClient::new(config).unwrap();
    let report = client.delete_matching("_json_compres.gz").await.unwrap();
    assert!(report.deleted.is_empty());
}
