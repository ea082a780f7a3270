//! Integration tests using wiremock to simulate the Kakao services.
//!
//! The client is blocking, so it is built, used and dropped inside `spawn_blocking`.

use kakao_api::api::inference::TextGenerationParams;
use kakao_api::api::pose::PoseJobStatus;
use kakao_api::api::speech::{Speak, Voice, VoiceType};
use kakao_api::api::translation::Language;
use kakao_api::api::ImageSource;
use kakao_api::{ApiErrorKind, BodyEncoding, Client, ClientBuilder, Endpoints, Error};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

const RECOGNITION_BODY: &str = "------newtoneFeldpXiEUcgOlZIe
Content-Type: application/json; charset=UTF-8

{\"type\":\"beginPointDetection\",\"value\":\"BPD\"}
------newtoneFeldpXiEUcgOlZIe
Content-Type: application/json; charset=UTF-8

{\"type\":\"partialResult\",\"value\":\"헤이\"}
------newtoneFeldpXiEUcgOlZIe
Content-Type: application/json; charset=UTF-8
Speech-Length: 6

{\"type\":\"finalResult\",\"value\":\"헤이 카카오\",\"nBest\":[{\"value\":\"헤이 카카오\",\"score\":24}]}
------newtoneFeldpXiEUcgOlZIe--
";

fn builder(server: &MockServer) -> ClientBuilder {
    Client::builder()
        .api_key("test-key")
        .endpoints(Endpoints::rooted_at(&server.uri()))
}

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("spawn_blocking should succeed")
}

#[tokio::test]
async fn test_generate_texts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/inference/kogpt/generation"))
        .and(header("authorization", "KakaoAK test-key"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({"prompt": "오늘 아침 하늘은", "max_tokens": 16, "n": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "generations": [{"text": " 맑았다", "tokens": 3}, {"text": " 흐렸다", "tokens": 3}],
            "usage": {"prompt_tokens": 6, "generated_tokens": 6, "total_tokens": 12}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let generated = blocking(move || {
        let client = client_builder.build().unwrap();
        client.generate_texts(TextGenerationParams::new("오늘 아침 하늘은", 16).with_n(2))
    })
    .await
    .unwrap();

    assert_eq!(generated.id, "gen-1");
    assert_eq!(generated.generations.len(), 2);
    assert_eq!(generated.usage.total_tokens, 12);
}

#[tokio::test]
async fn test_detect_face_uploads_multipart_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vision/face/detect"))
        .and(header("authorization", "KakaoAK test-key"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(r#"name="file"; filename="file.png""#))
        .and(body_string_contains("image/png"))
        .and(body_string_contains(r#"name="threshold""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rid": "r1",
            "result": {"width": 10, "height": 10, "faces": [{"score": 0.9, "x": 0.1, "y": 0.2, "w": 0.3, "h": 0.4}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let faces = blocking(move || {
        let client = client_builder.build().unwrap();
        client.detect_face(ImageSource::from_bytes(PNG), 0.7)
    })
    .await
    .unwrap();

    assert_eq!(faces.result.faces.len(), 1);
    assert_eq!(faces.result.faces[0].score, 0.9);
}

#[tokio::test]
async fn test_detect_face_from_url_sends_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vision/face/detect"))
        .and(body_json(json!({"image_url": "https://example.com/face.jpg", "threshold": 0.7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"faces": []}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let faces = blocking(move || {
        let client = client_builder.build().unwrap();
        client.detect_face(ImageSource::url("https://example.com/face.jpg"), 0.7)
    })
    .await
    .unwrap();

    assert!(faces.result.faces.is_empty());
}

#[tokio::test]
async fn test_form_encoding_is_configurable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/translation/language/detect"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("query=hello+world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "language_info": [{"code": "en", "name": "English", "confidence": 0.99}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server).body_encoding(BodyEncoding::FormUrlEncoded);
    let detected = blocking(move || {
        let client = client_builder.build().unwrap();
        client.detect_language("hello world")
    })
    .await
    .unwrap();

    assert_eq!(detected.language_info[0].code, "en");
}

#[tokio::test]
async fn test_translate_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translation/translate"))
        .and(body_json(json!({"query": "안녕하세요", "src_lang": "kr", "target_lang": "en"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translated_text": [["Hello."]]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let translated = blocking(move || {
        let client = client_builder.build().unwrap();
        client.translate_text("안녕하세요", Language::Korean, Language::English)
    })
    .await
    .unwrap();

    assert_eq!(translated.joined(), "Hello.");
}

#[tokio::test]
async fn test_api_error_with_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translation/translate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -401, "msg": "invalid key"})),
        )
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let result = blocking(move || {
        let client = client_builder.build().unwrap();
        client.translate_text("x", Language::Korean, Language::English)
    })
    .await;

    match result {
        Err(Error::Api {
            status,
            kind,
            message,
            raw_body,
        }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(kind, ApiErrorKind::Code(-401));
            assert_eq!(message, "invalid key");
            assert!(String::from_utf8_lossy(&raw_body).contains("invalid key"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_error_with_error_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/inference/kogpt/generation"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errorType": "RequestLimitExceeded",
            "message": "too many requests"
        })))
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let err = blocking(move || {
        let client = client_builder.build().unwrap();
        client.generate_texts(TextGenerationParams::new("x", 1))
    })
    .await
    .unwrap_err();

    assert!(err.is_retryable());
    match err {
        Error::Api { kind, message, .. } => {
            assert_eq!(kind, ApiErrorKind::Type("RequestLimitExceeded".to_string()));
            assert_eq!(message, "too many requests");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_error_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vision/adult/detect"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let result = blocking(move || {
        let client = client_builder.build().unwrap();
        client.detect_nsfw(ImageSource::url("https://example.com/a.jpg"))
    })
    .await;

    match result {
        Err(Error::HttpStatus { status, raw_body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(raw_body, b"internal error");
        }
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_decoding_error_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/inference/kogpt/generation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server).verbose(true);
    let err = blocking(move || {
        let client = client_builder.build().unwrap();
        client.generate_texts(TextGenerationParams::new("x", 1))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Decoding { .. }));
    assert_eq!(err.raw_body(), Some(&b"invalid json"[..]));
}

#[tokio::test]
async fn test_speech_to_text_with_undeclared_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/recognize"))
        .and(header("content-type", "application/octet-stream"))
        .and(header("transfer-encoding", "chunked"))
        .and(body_string("raw-pcm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(RECOGNITION_BODY.as_bytes(), "application/json; charset=UTF-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let recognized = blocking(move || {
        let client = client_builder.build().unwrap();
        client.speech_to_text(b"raw-pcm".to_vec())
    })
    .await
    .unwrap();

    assert_eq!(recognized.text, "헤이 카카오");
    assert_eq!(recognized.n_best.len(), 1);
}

#[tokio::test]
async fn test_speech_to_text_with_declared_multipart() {
    let mock_server = MockServer::start().await;

    let body = RECOGNITION_BODY.replace('\n', "\r\n");
    Mock::given(method("POST"))
        .and(path("/v1/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            body.into_bytes(),
            "multipart/form-data; boundary=----newtoneFeldpXiEUcgOlZIe",
        ))
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let recognized = blocking(move || {
        let client = client_builder.build().unwrap();
        client.speech_to_text(b"raw-pcm".to_vec())
    })
    .await
    .unwrap();

    assert_eq!(recognized.text, "헤이 카카오");
}

#[tokio::test]
async fn test_text_to_speech_sniffs_audio_type() {
    let mock_server = MockServer::start().await;

    let mp3 = b"ID3\x03\x00\x00\x00\x00\x00\x00audio".to_vec();
    Mock::given(method("POST"))
        .and(path("/v1/synthesize"))
        .and(header("content-type", "application/xml"))
        .and(body_string(r#"<speak><voice name="MAN_READ_CALM">안녕하세요</voice></speak>"#))
        .respond_with(ResponseTemplate::new(200).set_body_raw(mp3.clone(), "application/octet-stream"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let speech = blocking(move || {
        let client = client_builder.build().unwrap();
        let speak = Speak::new(vec![Voice::new("안녕하세요").with_voice_type(VoiceType::ManReadCalm)]);
        client.text_to_speech(&speak)
    })
    .await
    .unwrap();

    assert_eq!(speech.content_type, "audio/mpeg");
    assert_eq!(speech.audio, mp3);
}

#[tokio::test]
async fn test_pose_job_submit_and_retrieve() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pose/job"))
        .and(body_json(json!({"video_url": "https://example.com/v.mp4", "smoothing": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "job-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pose/job/job-1"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-1",
            "status": "processing"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server);
    let analysis = blocking(move || -> kakao_api::Result<_> {
        let client = client_builder.build()?;
        let requested = client.analyze_pose_from_video_url("https://example.com/v.mp4", true, Some(""))?;
        client.retrieve_pose_video_analysis(&requested.job_id)
    })
    .await
    .unwrap();

    assert_eq!(analysis.status, PoseJobStatus::Processing);
    assert!(!analysis.status.is_finished());
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vision/multitag/generate"))
        .and(header("x-app-name", "kakao-demo"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"label": ["cat"], "label_kr": ["고양이"]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server)
        .default_header("X-App-Name", "kakao-demo")
        .unwrap();
    let tags = blocking(move || {
        let client = client_builder.build().unwrap();
        client.generate_tags(ImageSource::url("https://example.com/cat.jpg"))
    })
    .await
    .unwrap();

    assert_eq!(tags.result.label_kr, vec!["고양이".to_string()]);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vision/adult/detect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client_builder = builder(&mock_server).timeout(Duration::from_millis(200));
    let err = blocking(move || {
        let client = client_builder.build().unwrap();
        client.detect_nsfw(ImageSource::url("https://example.com/a.jpg"))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Timeout), "Expected Timeout, got {:?}", err);
    assert!(err.raw_body().is_none());
}

#[test]
fn test_timeout_while_reading_body() {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 8192];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"a\"",
        );
        let _ = stream.flush();
        std::thread::sleep(Duration::from_secs(3));
    });

    let client = Client::builder()
        .api_key("test-key")
        .endpoints(Endpoints::rooted_at(&format!("http://{}", addr)))
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let err = client.detect_language("hello").unwrap_err();

    assert!(matches!(err, Error::Timeout), "Expected Timeout, got {:?}", err);
    assert!(err.raw_body().is_none());
    server.join().unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let err = blocking(|| {
        let client = Client::builder()
            .api_key("test-key")
            .endpoints(Endpoints::rooted_at("http://127.0.0.1:1"))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        client.detect_language("hello")
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "Expected Transport, got {:?}", err);
    assert!(err.status().is_none());
}
