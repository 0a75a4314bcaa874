use std::sync::{Arc, Mutex};

use doc_toolbox::clients::{
    DocumentClient, HttpTransport, ProgressCallback, SubtitleClient, Transport,
};
use doc_toolbox::error::{AppError, TransferError, ValidationError};
use doc_toolbox::models::{PunctuationCatalog, SubtitleRequest, UploadFile, UploadId};
use doc_toolbox::services::{build_map, ReplacementPolicy};
use doc_toolbox::Config;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> Arc<dyn Transport> {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    Arc::new(HttpTransport::new(&config).expect("client builds"))
}

fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<(u64, u64)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: ProgressCallback = Arc::new(move |loaded: u64, total: u64| {
        sink.lock().unwrap().push((loaded, total));
    });
    (callback, seen)
}

#[tokio::test]
async fn multipart_upload_reports_progress_and_reads_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/replace"))
        .and(body_string_contains("name=\"replacements\""))
        .and(body_string_contains("name=\"file\"; filename=\"report.docx\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"processed.docx\"",
                )
                .set_body_raw(
                    b"PK\x03\x04processed".to_vec(),
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = DocumentClient::new(transport(&server));
    let file = UploadFile::new(UploadId(1), "report.docx", vec![7u8; 200 * 1024]);
    let map = build_map(
        ReplacementPolicy::OnlyPauseSymbols,
        &PunctuationCatalog::standard(),
    );
    let json = DocumentClient::serialize_map(&map).unwrap();
    let (progress, seen) = recording_progress();

    let artifact = client
        .replace_document_keywords(DocumentClient::build_payload(&file, &json), progress)
        .await
        .expect("upload succeeds");

    assert_eq!(artifact.filename.as_deref(), Some("processed.docx"));
    assert_eq!(&artifact.bytes[..], b"PK\x03\x04processed");
    assert!(artifact.content_type.contains("wordprocessingml"));

    let seen = seen.lock().unwrap().clone();
    assert!(seen.len() >= 4, "one event per 64 KiB chunk: {:?}", seen);
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(seen.last(), Some(&(200 * 1024, 200 * 1024)));
}

#[tokio::test]
async fn non_success_status_is_a_transfer_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/replace"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "Only .docx files are supported" })),
        )
        .mount(&server)
        .await;

    let client = DocumentClient::new(transport(&server));
    let file = UploadFile::new(UploadId(1), "a.txt", b"hello".to_vec());
    let (progress, _) = recording_progress();

    let err = client
        .replace_document_keywords(DocumentClient::build_payload(&file, "{}"), progress)
        .await
        .unwrap_err();

    match err {
        AppError::Transfer(TransferError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Only .docx files are supported");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let client = DocumentClient::new(Arc::new(HttpTransport::new(&config).unwrap()));
    let file = UploadFile::new(UploadId(1), "a.docx", b"x".to_vec());
    let (progress, _) = recording_progress();

    let err = client
        .replace_document_keywords(DocumentClient::build_payload(&file, "{}"), progress)
        .await
        .unwrap_err();
    assert!(err.is_environmental());
}

#[tokio::test]
async fn subtitles_return_structured_texts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/download"))
        .and(body_json(serde_json::json!({
            "urls": ["https://youtu.be/a", "https://youtu.be/b"],
            "output_word": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Subtitles downloaded successfully",
            "subtitle_texts": ["first", "second"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SubtitleClient::new(transport(&server));
    let batch = client
        .download_subtitles(SubtitleRequest {
            urls: vec![
                " https://youtu.be/a ".to_string(),
                String::new(),
                "https://youtu.be/b".to_string(),
            ],
            output_word: false,
        })
        .await
        .unwrap()
        .into_text_batch()
        .unwrap();

    assert!(batch.success);
    assert_eq!(batch.texts(), ["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn subtitles_as_document_use_header_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=subs.docx")
                .set_body_raw(b"PK\x03\x04".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = SubtitleClient::new(transport(&server));
    let artifact = client
        .download_subtitles(SubtitleRequest {
            urls: vec!["https://youtu.be/a".to_string()],
            output_word: true,
        })
        .await
        .unwrap()
        .into_file()
        .unwrap();

    assert_eq!(artifact.filename.as_deref(), Some("subs.docx"));
}

#[tokio::test]
async fn empty_url_batch_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SubtitleClient::new(transport(&server));
    let err = client
        .download_subtitles(SubtitleRequest {
            urls: vec!["   ".to_string(), String::new()],
            output_word: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::EmptyUrlBatch)
    ));
    assert_eq!(err.to_string(), "校验错误: Please enter at least one YouTube URL");
}
