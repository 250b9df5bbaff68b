//! End-to-end pipeline tests: CSV in, two mocked model servers, CSV out.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use soulcare_sentiment::dataset::read_csv_from_reader;
use soulcare_sentiment::sources::parse_complaint_page;
use soulcare_sentiment::{
    read_csv, write_csv, SelectedModel, SentimentCategory, SentimentConfig, SentimentError,
    SentimentPipeline,
};

fn config(text_url: &str, emoji_url: &str) -> SentimentConfig {
    SentimentConfig {
        text_model_url: text_url.to_string(),
        emoji_model_url: emoji_url.to_string(),
        text_model_name: "star-model".to_string(),
        emoji_model_name: "polarity-model".to_string(),
        text_column: "Texto".to_string(),
        batch_size: 16,
        timeout_secs: 5,
    }
}

async fn mount_predictions(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn pipeline_enriches_dataset_and_writes_csv() {
    let text_server = MockServer::start().await;
    let emoji_server = MockServer::start().await;

    mount_predictions(
        &text_server,
        json!([
            [{"label": "1 star", "score": 0.88}],
            [{"label": "3 stars", "score": 0.41}],
            [{"label": "5 stars", "score": 0.52}]
        ]),
    )
    .await;
    mount_predictions(
        &emoji_server,
        json!([
            [{"label": "negative", "score": 0.93}],
            [{"label": "positive", "score": 0.97}],
            [{"label": "neutral", "score": 0.60}]
        ]),
    )
    .await;

    let csv = "Autor,Texto,Canal\n\
               Ana,O pedido chegou quebrado e ninguém responde,site\n\
               Beto,😍😍😍,app\n\
               Caio,😀😀 hi,app\n";
    let dataset = read_csv_from_reader(csv.as_bytes(), "Texto").unwrap();
    let headers = dataset.headers.clone();

    let pipeline =
        SentimentPipeline::from_config(&config(&text_server.uri(), &emoji_server.uri())).unwrap();
    let analysis = pipeline.run(dataset.records.clone()).await.unwrap();

    assert_eq!(analysis.records.len(), 3);
    for (enriched, original) in analysis.records.iter().zip(&dataset.records) {
        assert_eq!(&enriched.record, original);
    }

    let ana = &analysis.records[0].enrichment;
    assert_eq!(ana.selected_model, SelectedModel::Text);
    assert_eq!(ana.final_sentiment, SentimentCategory::Negative);
    assert_eq!(ana.final_stars, 1);

    let beto = &analysis.records[1].enrichment;
    assert_eq!(beto.selected_model, SelectedModel::Emoji);
    assert_eq!(beto.final_sentiment, SentimentCategory::Positive);
    assert_eq!(beto.final_stars, 5);
    assert_eq!(beto.stars_text, 3);

    let caio = &analysis.records[2].enrichment;
    assert_eq!(caio.selected_model, SelectedModel::Text);
    assert_eq!(caio.final_stars, 5);
    assert_eq!(caio.sentiment_emoji, SentimentCategory::Neutral);

    assert_eq!(analysis.summary.total, 3);
    assert_eq!(analysis.summary.count(SentimentCategory::Positive), 2);
    assert_eq!(analysis.summary.count(SentimentCategory::Negative), 1);

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("analise.csv");
    write_csv(&out_path, &headers, &analysis.records).unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    let first_line = written.lines().next().unwrap();
    assert!(first_line.starts_with("Autor,Texto,Canal,sentiment_text,"));
    assert!(first_line.ends_with(",selected_model"));

    // The written file reads back with the same originals and ten extra columns.
    let reread = read_csv(&out_path, "Texto").unwrap();
    assert_eq!(reread.headers.len(), headers.len() + 10);
    assert_eq!(reread.records[1].get("Texto"), Some("😍😍😍"));
    assert_eq!(reread.records[1].get("selected_model"), Some("Emoji"));
    assert_eq!(reread.records[2].get("Canal"), Some("app"));
}

#[tokio::test]
async fn failing_model_aborts_without_output() {
    let text_server = MockServer::start().await;
    let emoji_server = MockServer::start().await;

    mount_predictions(&text_server, json!([[{"label": "4 stars", "score": 0.7}]])).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&emoji_server)
        .await;

    let pipeline =
        SentimentPipeline::from_config(&config(&text_server.uri(), &emoji_server.uri())).unwrap();
    let records = parse_complaint_page("<h5>Ana</h5><p>bom</p>");

    let err = pipeline.run(records).await.unwrap_err();
    assert!(
        matches!(err, SentimentError::Classifier { ref model, .. } if model == "polarity-model"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn blank_text_degrades_to_neutral_without_model_calls() {
    let text_server = MockServer::start().await;
    let emoji_server = MockServer::start().await;

    for server in [&text_server, &emoji_server] {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }

    let pipeline =
        SentimentPipeline::from_config(&config(&text_server.uri(), &emoji_server.uri())).unwrap();
    let records = parse_complaint_page("<h5>Ana</h5><p>   </p>");

    let analysis = pipeline.run(records).await.unwrap();
    let e = &analysis.records[0].enrichment;
    assert_eq!(e.selected_model, SelectedModel::Text);
    assert_eq!(e.final_sentiment, SentimentCategory::Neutral);
    assert_eq!(e.final_stars, 3);
    assert!(e.final_confidence.abs() < f32::EPSILON);
}
