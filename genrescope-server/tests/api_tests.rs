//! HTTP API integration tests
//!
//! The router runs against a stub classifier (the real model artifact is
//! not needed to exercise the boundary), a temp upload dir, and a real
//! SQLite catalog.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use ndarray::Array4;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use genrescope_common::Config;
use genrescope_server::db::catalog::SqliteCatalog;
use genrescope_server::db::init_database_pool;
use genrescope_server::models::GenrePrediction;
use genrescope_server::services::classifier::{
    prediction_from_scores, ClassifierError, GenrePredictor,
};
use genrescope_server::{build_router, AppState};

/// Deterministic classifier standing in for the ONNX model
struct StubPredictor {
    scores: Vec<f32>,
}

impl StubPredictor {
    /// Always predicts Rock (index 9) with high confidence
    fn rock() -> Self {
        let mut scores = vec![0.01f32; 10];
        scores[9] = 0.91;
        Self { scores }
    }
}

impl GenrePredictor for StubPredictor {
    fn predict(&self, _tensor: &Array4<f32>) -> Result<GenrePrediction, ClassifierError> {
        prediction_from_scores(self.scores.clone())
    }
}

struct TestApp {
    state: AppState,
    pool: sqlx::SqlitePool,
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let pool = init_database_pool(&dir.path().join("catalog.db"))
        .await
        .expect("catalog db");

    let mut config = Config::default();
    config.upload_dir = dir.path().join("uploads");
    config.genre_facts_path = dir.path().join("facts.json");
    config.contact_log_path = dir.path().join("contacts.json");
    std::fs::create_dir_all(&config.upload_dir).unwrap();

    let state = AppState::new(
        config,
        Arc::new(StubPredictor::rock()),
        Arc::new(SqliteCatalog::new(pool.clone())),
    );

    TestApp { state, pool, _dir: dir }
}

fn write_tone_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for i in 0..22_050 {
        let sample = 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22_050.0).sin();
        writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

async fn seed_rock_catalog(pool: &sqlx::SqlitePool) {
    for (song, artist, is_new) in [
        ("Fresh Cut", "Newcomer", true),
        ("Old Favorite", "Big Name", false),
        ("Another Debut", "Upstart", true),
    ] {
        sqlx::query(
            "INSERT INTO music_features (song, artist, genre, energy, danceability, loudness, is_new_artist) \
             VALUES (?, ?, 'Rock', 0.4, 0.5, 0.6, ?)",
        )
        .bind(song)
        .bind(artist)
        .bind(is_new)
        .execute(pool)
        .await
        .unwrap();
    }
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let router = build_router(app.state.clone());

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "genrescope-server");
}

#[tokio::test]
async fn track_listing_filters_and_sorts() {
    let app = test_app().await;
    let uploads = app.state.config.upload_dir.clone();
    write_tone_wav(&uploads.join("tone.wav"));
    std::fs::write(uploads.join("notes.txt"), "not audio").unwrap();
    std::fs::write(uploads.join("cover.jpg"), "not audio either").unwrap();

    let router = build_router(app.state.clone());
    let response = router
        .oneshot(Request::builder().uri("/api/tracks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let tracks = body.as_array().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0]["name"], "tone.wav");
    assert!(tracks[0]["album_art"]
        .as_str()
        .unwrap()
        .starts_with("/static/images/album-art/"));
}

#[tokio::test]
async fn analyze_rejects_bad_extension_and_traversal() {
    let app = test_app().await;
    let router = build_router(app.state.clone());

    let response = router
        .clone()
        .oneshot(json_post("/api/analyze", serde_json::json!({"filename": "track.ogg"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(json_post(
            "/api/analyze",
            serde_json::json!({"filename": "../secret.mp3"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(json_post(
            "/api/analyze",
            serde_json::json!({"filename": "absent.mp3"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn analyze_returns_genre_features_and_new_artist_recommendations() {
    let app = test_app().await;
    seed_rock_catalog(&app.pool).await;
    write_tone_wav(&app.state.config.upload_dir.join("tone.wav"));
    std::fs::write(
        &app.state.config.genre_facts_path,
        r#"{"Rock": ["Rock fact one"]}"#,
    )
    .unwrap();

    let router = build_router(app.state.clone());
    let response = router
        .oneshot(json_post("/api/analyze", serde_json::json!({"filename": "tone.wav"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["genre"], "Rock");
    assert_eq!(body["scores"].as_array().unwrap().len(), 10);
    assert_eq!(body["genre_fact"], "Rock fact one");

    let loudness = body["features"]["loudness"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&loudness));

    // Both emerging artists and no established ones
    let recommendations = body["recommendations"].as_array().unwrap();
    let artists: Vec<&str> = recommendations
        .iter()
        .map(|r| r["artist"].as_str().unwrap())
        .collect();
    assert_eq!(artists, ["Newcomer", "Upstart"]);
}

#[tokio::test]
async fn analyze_degrades_to_empty_recommendations_on_catalog_failure() {
    let app = test_app().await;
    write_tone_wav(&app.state.config.upload_dir.join("tone.wav"));
    sqlx::query("DROP TABLE music_features")
        .execute(&app.pool)
        .await
        .unwrap();

    let router = build_router(app.state.clone());
    let response = router
        .oneshot(json_post("/api/analyze", serde_json::json!({"filename": "tone.wav"})))
        .await
        .unwrap();

    // Classification still succeeds; recommendations degrade to empty
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["genre"], "Rock");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unreadable_audio_fails_the_decode_stage() {
    let app = test_app().await;
    std::fs::write(app.state.config.upload_dir.join("fake.mp3"), b"not audio").unwrap();

    let router = build_router(app.state.clone());
    let response = router
        .oneshot(json_post("/api/analyze", serde_json::json!({"filename": "fake.mp3"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "DECODE_ERROR");
}

#[tokio::test]
async fn contact_form_appends_to_the_log() {
    let app = test_app().await;
    let router = build_router(app.state.clone());

    let response = router
        .clone()
        .oneshot(json_post(
            "/api/contact",
            serde_json::json!({"name": "Ada", "email": "ada@example.com", "message": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content = std::fs::read_to_string(&app.state.config.contact_log_path).unwrap();
    let messages: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(messages.as_array().unwrap().len(), 1);
    assert_eq!(messages[0]["name"], "Ada");

    // Empty message is rejected and not logged
    let response = router
        .oneshot(json_post(
            "/api/contact",
            serde_json::json!({"name": "Ada", "email": "ada@example.com", "message": "  "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_requires_a_query() {
    let app = test_app().await;
    let router = build_router(app.state.clone());

    let response = router
        .oneshot(json_post("/api/download", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pipeline_is_deterministic_for_identical_input() {
    use genrescope_server::services::pipeline::extract_and_classify;

    let app = test_app().await;
    let path = app.state.config.upload_dir.join("tone.wav");
    write_tone_wav(&path);

    let predictor = StubPredictor::rock();
    let (features_a, prediction_a) = extract_and_classify(&path, &predictor).unwrap();
    let (features_b, prediction_b) = extract_and_classify(&path, &predictor).unwrap();

    assert_eq!(features_a, features_b);
    assert_eq!(prediction_a.label, prediction_b.label);
    assert_eq!(prediction_a.scores, prediction_b.scores);
}
