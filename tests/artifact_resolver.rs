use bytes::Bytes;
use tokio_test::assert_ok;

use doc_toolbox::clients::RawResponse;
use doc_toolbox::error::{AppError, DecodingError, PreconditionFault};
use doc_toolbox::models::TransferResult;
use doc_toolbox::services::{extract_filename, resolve};

fn binary(body: &'static [u8], disposition: Option<&str>) -> RawResponse {
    RawResponse {
        status: 200,
        content_type: Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        ),
        content_disposition: disposition.map(str::to_string),
        body: Some(Bytes::from_static(body)),
    }
}

#[test]
fn filename_is_extracted_from_content_disposition() {
    assert_eq!(
        extract_filename(r#"attachment; filename="report final.docx""#).as_deref(),
        Some("report final.docx")
    );
    assert_eq!(
        extract_filename("attachment; filename=plain.docx").as_deref(),
        Some("plain.docx")
    );
    assert_eq!(
        extract_filename("attachment; filename='single.docx'; size=10").as_deref(),
        Some("single.docx")
    );
    assert_eq!(
        extract_filename(r#"attachment; filename*=UTF-8''%E5%AD%97%E5%B9%95.docx"#).as_deref(),
        Some("UTF-8%E5%AD%97%E5%B9%95.docx")
    );
}

#[test]
fn missing_or_malformed_filename_is_none() {
    assert_eq!(extract_filename("attachment"), None);
    assert_eq!(extract_filename("inline; name=x"), None);
    assert_eq!(extract_filename(r#"attachment; filename="""#), None);
    assert_eq!(extract_filename(""), None);
}

#[test]
fn binary_response_becomes_file_artifact() {
    let raw = binary(b"PK\x03\x04doc", Some(r#"attachment; filename="out.docx""#));
    let artifact = resolve(raw, true).unwrap().into_file().unwrap();

    assert_eq!(artifact.filename.as_deref(), Some("out.docx"));
    assert_eq!(&artifact.bytes[..], b"PK\x03\x04doc");
    assert!(artifact.content_type.contains("wordprocessingml"));
}

#[test]
fn missing_content_type_falls_back_to_payload_type() {
    let raw = RawResponse {
        status: 200,
        content_type: None,
        content_disposition: None,
        body: Some(Bytes::from_static(b"%PDF-1.4")),
    };
    let artifact = resolve(raw, true).unwrap().into_file().unwrap();
    assert_eq!(artifact.content_type, "application/pdf");
    assert_eq!(artifact.filename, None);
    assert_eq!(artifact.resolved_name(None, "input.pdf"), "input.pdf");
    assert_eq!(artifact.resolved_name(Some("custom.pdf"), "input.pdf"), "custom.pdf");
}

#[test]
fn structured_response_becomes_text_batch() {
    let raw = RawResponse {
        status: 200,
        content_type: Some("application/json".to_string()),
        content_disposition: None,
        body: Some(Bytes::from_static(
            br#"{"success":true,"message":"ok","subtitle_texts":["one","two"]}"#,
        )),
    };
    let batch = assert_ok!(resolve(raw, false)).into_text_batch().unwrap();
    assert!(batch.success);
    assert_eq!(batch.texts(), ["one".to_string(), "two".to_string()]);
}

#[test]
fn structured_response_without_texts_is_empty() {
    let raw = RawResponse {
        status: 200,
        body: Some(Bytes::from_static(br#"{"success":false,"message":"no captions"}"#)),
        ..Default::default()
    };
    match resolve(raw, false).unwrap() {
        TransferResult::TextBatch(batch) => {
            assert!(batch.texts().is_empty());
            assert_eq!(batch.message, "no captions");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn malformed_structured_response_is_a_decoding_error() {
    let raw = binary(b"PK\x03\x04doc", None);
    let err = resolve(raw, false).unwrap_err();
    assert!(matches!(err, AppError::Decoding(DecodingError::InvalidText) | AppError::Decoding(DecodingError::Json(_))));
    assert!(err.is_environmental());
}

#[test]
fn missing_payload_is_a_precondition_fault() {
    let raw = RawResponse {
        status: 200,
        ..Default::default()
    };
    let err = resolve(raw, true).unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFault::MissingPayload)
    ));
    assert!(!err.is_environmental());
}

#[test]
fn download_writes_file_and_leaves_no_temporaries() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = resolve(binary(b"content", Some("attachment; filename=\"a.docx\"")), true)
        .unwrap()
        .into_file()
        .unwrap();

    let first = artifact.download(dir.path(), None, "fallback.docx").unwrap();
    let second = artifact.download(dir.path(), None, "fallback.docx").unwrap();
    let custom = artifact
        .download(dir.path(), Some("mine.docx"), "fallback.docx")
        .unwrap();

    assert_eq!(first, dir.path().join("a.docx"));
    assert_eq!(second, dir.path().join("a (1).docx"));
    assert_eq!(custom, dir.path().join("mine.docx"));
    assert_eq!(std::fs::read(&first).unwrap(), b"content");

    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 3);
}

#[test]
fn download_uses_fallback_name_when_header_has_none() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = resolve(binary(b"x", Some("attachment")), true)
        .unwrap()
        .into_file()
        .unwrap();

    let path = artifact
        .download(&dir.path().join("nested"), None, "upload.docx")
        .unwrap();
    assert_eq!(path, dir.path().join("nested").join("upload.docx"));
}
