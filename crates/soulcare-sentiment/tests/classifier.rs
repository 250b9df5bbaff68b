//! Integration tests for `TeiClassifier` against a mocked `/predict` endpoint.
//!
//! Uses `wiremock` so no model server is needed. Covers label selection,
//! batching, blank-input handling and every fatal response shape.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use soulcare_sentiment::{
    ClassifierOutput, LabelFamily, SentimentClassifier, SentimentError, TeiClassifier,
};

fn star_client(server: &MockServer, batch_size: usize) -> TeiClassifier {
    TeiClassifier::new(
        &server.uri(),
        "test-star-model",
        LabelFamily::StarRating,
        batch_size,
        Duration::from_secs(5),
    )
    .expect("failed to build test classifier")
}

#[tokio::test]
async fn classify_picks_highest_scoring_label() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [
                {"label": "1 star", "score": 0.10},
                {"label": "4 stars", "score": 0.70},
                {"label": "5 stars", "score": 0.20}
            ]
        ])))
        .mount(&server)
        .await;

    let outputs = star_client(&server, 8).classify(&["gostei"]).await.unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].label, "4 stars");
    assert!((outputs[0].confidence - 0.70).abs() < 1e-6);
}

#[tokio::test]
async fn classify_sends_one_sequence_per_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({
            "inputs": [["péssimo"], ["😡😡"]],
            "raw_scores": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "1 star", "score": 0.9}],
            [{"label": "2 stars", "score": 0.6}]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let outputs = star_client(&server, 8)
        .classify(&["péssimo", "😡😡"])
        .await
        .unwrap();
    assert_eq!(outputs[0].label, "1 star");
    assert_eq!(outputs[1].label, "2 stars");
}

#[tokio::test]
async fn classify_splits_into_batches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"inputs": [["a"], ["b"]], "raw_scores": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "1 star", "score": 0.5}],
            [{"label": "2 stars", "score": 0.5}]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"inputs": [["c"]], "raw_scores": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "3 stars", "score": 0.5}]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let outputs = star_client(&server, 2)
        .classify(&["a", "b", "c"])
        .await
        .unwrap();
    let labels: Vec<_> = outputs.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["1 star", "2 stars", "3 stars"]);
}

#[tokio::test]
async fn blank_inputs_are_not_sent_and_keep_their_position() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"inputs": [["ok"]], "raw_scores": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "5 stars", "score": 0.8}]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let outputs = star_client(&server, 8)
        .classify(&["", "ok", "   "])
        .await
        .unwrap();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0], ClassifierOutput::blank());
    assert_eq!(outputs[1].label, "5 stars");
    assert_eq!(outputs[2], ClassifierOutput::blank());
}

#[tokio::test]
async fn all_blank_inputs_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let outputs = star_client(&server, 8).classify(&["", " "]).await.unwrap();
    assert_eq!(outputs, vec![ClassifierOutput::blank(); 2]);
}

#[tokio::test]
async fn server_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = star_client(&server, 8).classify(&["ok"]).await.unwrap_err();
    match err {
        SentimentError::Classifier { model, message } => {
            assert_eq!(model, "test-star-model");
            assert!(message.contains("503"), "got: {message}");
        }
        other => panic!("expected Classifier error, got: {other:?}"),
    }
}

#[tokio::test]
async fn wrong_prediction_count_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "5 stars", "score": 0.8}]
        ])))
        .mount(&server)
        .await;

    let err = star_client(&server, 8)
        .classify(&["um", "dois"])
        .await
        .unwrap_err();
    assert!(
        matches!(err, SentimentError::Classifier { ref message, .. } if message.contains("1 predictions for 2 inputs")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn empty_label_list_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[]])))
        .mount(&server)
        .await;

    let err = star_client(&server, 8).classify(&["ok"]).await.unwrap_err();
    assert!(
        matches!(err, SentimentError::Classifier { ref message, .. } if message.contains("empty label list")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = star_client(&server, 8).classify(&["ok"]).await.unwrap_err();
    assert!(
        matches!(err, SentimentError::Classifier { ref message, .. } if message.contains("parse")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"label": "neutral", "score": 0.4}]
        ])))
        .mount(&server)
        .await;

    let client = TeiClassifier::new(
        &format!("{}/", server.uri()),
        "test-polarity-model",
        LabelFamily::Polarity,
        8,
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(client.family(), LabelFamily::Polarity);
    assert_eq!(client.name(), "test-polarity-model");

    let outputs = client.classify(&["🙂"]).await.unwrap();
    assert_eq!(outputs[0].label, "neutral");
}
