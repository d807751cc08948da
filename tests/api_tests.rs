
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use test_utils::{word_batch, TestApp};

use daily_prep::storage::FileStore;

fn ids(data: &Value) -> Vec<String> {
    data.as_array()
        .expect("array payload")
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn second_request_of_the_day_is_served_from_storage() {
    let app = TestApp::new();
    app.mock.push_success(word_batch(12));

    let (status, first) = app.get("/api/vocabulary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["message"], "Vocabulary generated successfully");
    assert_eq!(first["data"].as_array().unwrap().len(), 10);
    assert_eq!(first["data"][0]["word"], "Word0");
    assert_eq!(app.mock.call_count(), 1);

    let (status, second) = app.get("/api/vocabulary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], "Today's vocabulary already generated");
    assert_eq!(ids(&second["data"]), ids(&first["data"]));
    assert_eq!(app.mock.call_count(), 1);
}

#[tokio::test]
async fn concurrent_first_requests_generate_one_batch() {
    let app = TestApp::new();
    app.mock.push_success(word_batch(10));

    let ((first_status, first), (second_status, second)) =
        tokio::join!(app.get("/api/vocabulary"), app.get("/api/vocabulary"));
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(app.mock.call_count(), 1);
    assert_eq!(app.mock.remaining(), 0);
    assert_eq!(ids(&first["data"]), ids(&second["data"]));
    assert_eq!(app.state.vocabulary.all().await.unwrap().len(), 10);
}

#[cfg(feature = "gemini")]
#[tokio::test]
async fn stalled_provider_times_out_into_fallback() {
    use std::time::Duration;

    use daily_prep::clients::{FlexibleClient, GeminiConfig};
    use daily_prep::storage::MemoryStore;

    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = FlexibleClient::gemini(GeminiConfig {
        api_key: "test-key".to_string(),
        base_url: format!("http://{addr}"),
        timeout: Duration::from_millis(300),
        ..GeminiConfig::default()
    });
    let (_, mock) = FlexibleClient::mock();
    let app = TestApp::with_client(client, mock, Arc::new(MemoryStore::new()));

    let (status, body) = tokio::time::timeout(Duration::from_secs(5), app.get("/api/vocabulary"))
        .await
        .expect("generation gave up on the stalled provider");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["word"], "Perspicacious");

    let word_id = body["data"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = tokio::time::timeout(
        Duration::from_secs(1),
        app.post("/api/vocabulary", json!({"wordId": word_id, "updates": {"learned": true}})),
    )
    .await
    .expect("collection lock released after generation");
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_model_output_serves_fallback_content() {
    let app = TestApp::new();
    app.mock.push_success("I'm sorry, I can't produce idioms right now.");

    let (status, body) = app.get("/api/idioms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Idioms generated successfully");
    let idioms = body["data"].as_array().unwrap();
    assert_eq!(idioms.len(), 5);
    assert_eq!(idioms[0]["idiom"], "Break the ice");
}

#[tokio::test]
async fn unreachable_model_serves_fallback_news() {
    let app = TestApp::new();
    app.mock.push_error("connection refused");

    let (status, body) = app.get("/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Current affairs generated successfully");
    let news = body["data"].as_array().unwrap();
    assert_eq!(news.len(), 5);
    assert!(news.iter().all(|n| n["isRead"] == false));
}

#[tokio::test]
async fn updates_merge_into_stored_records() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/vocabulary").await;
    let word_id = body["data"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"][0]["word"], "Perspicacious");

    let (status, updated) = app
        .post(
            "/api/vocabulary",
            json!({"wordId": word_id, "updates": {"learned": true, "userExample": "A perspicacious choice."}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Word updated successfully");
    assert_eq!(updated["data"]["learned"], true);
    assert_eq!(updated["data"]["id"], word_id.as_str());

    let (_, again) = app.get("/api/vocabulary").await;
    assert_eq!(again["data"][0]["userExample"], "A perspicacious choice.");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new();
    app.get("/api/vocabulary").await;
    app.get("/api/daily-gk").await;

    let (status, body) = app.post("/api/vocabulary", json!({"wordId": "missing", "updates": {"learned": true}})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Word not found"}));

    let (status, body) = app.post("/api/daily-gk", json!({"factId": "missing", "updates": {"learned": true}})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Fact not found");

    let (status, body) = app.post("/api/quiz", json!({"questionId": "missing", "userAnswer": "A"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Question not found");

    let (status, body) = app.post("/api/news", json!({"newsId": "missing", "updates": {"isRead": true}})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "News item not found");
}

#[tokio::test]
async fn missing_or_invalid_fields_are_bad_requests() {
    let app = TestApp::new();

    let cases = [
        ("/api/vocabulary", json!({"updates": {"learned": true}}), "Missing wordId or updates"),
        ("/api/idioms", json!({"idiomId": "x"}), "Missing idiomId or updates"),
        ("/api/daily-gk", json!({"factId": "", "updates": {}}), "Missing factId or updates"),
        ("/api/quiz", json!({"questionId": "x"}), "Missing questionId or userAnswer"),
        (
            "/api/practice",
            json!({"userSentence": "She is sanguine.", "type": "vocabulary"}),
            "Missing required fields: userSentence, targetWord, type",
        ),
        ("/api/evaluate-sentence", json!({"word": "Laconic"}), "Word and sentence are required"),
    ];
    for (uri, body, message) in cases {
        let (status, response) = app.post(uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response["error"], message, "{uri}");
    }

    let (status, response) = app.post_raw("/api/vocabulary", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn updates_that_break_the_record_shape_are_rejected() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/vocabulary").await;
    let word_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app.post("/api/vocabulary", json!({"wordId": word_id, "updates": {"learned": "yes"}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, again) = app.get("/api/vocabulary").await;
    assert_eq!(again["data"][0]["learned"], false);
}

#[tokio::test]
async fn quiz_answers_are_scored_and_recorded() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/quiz").await;
    let questions = body["data"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 5);

    let (status, right) = app.post("/api/quiz", json!({"questionId": questions[0]["id"], "userAnswer": "A"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(right["message"], "Correct answer!");
    assert_eq!(right["data"]["correct"], true);

    let (_, wrong) = app.post("/api/quiz", json!({"questionId": questions[1]["id"], "userAnswer": "A"})).await;
    assert_eq!(wrong["message"], "Incorrect answer");
    assert_eq!(wrong["data"]["correct"], false);
    assert_eq!(wrong["data"]["correctAnswer"], "B");
    assert!(wrong["data"]["explanation"].as_str().unwrap().contains("Kosi"));

    let (_, body) = app.get("/api/quiz").await;
    assert_eq!(body["data"][0]["answeredCorrectly"], true);
    assert_eq!(body["data"][1]["userAnswer"], "A");
    assert_eq!(body["data"][1]["answeredCorrectly"], false);
}

#[tokio::test]
async fn practice_sessions_are_stored_and_summarised() {
    let app = TestApp::new();
    app.mock.push_success(
        r#"{"grammar": "Correct", "clarity": "Clear", "usage": "Natural", "suggestions": ["Vary the opening"], "score": 8}"#,
    );

    let (status, body) = app
        .post(
            "/api/practice",
            json!({"userSentence": "Her sanguine outlook lifted the team.", "targetWord": "Sanguine", "type": "vocabulary"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Practice evaluated successfully");
    assert_eq!(body["data"]["evaluation"]["score"], 8);
    assert!(!body["data"]["sessionId"].as_str().unwrap().is_empty());

    // Nothing queued: the fallback evaluation is stored instead.
    let (_, body) = app
        .post(
            "/api/practice",
            json!({"userSentence": "We broke the ice.", "targetWord": "Break the ice", "type": "idiom"}),
        )
        .await;
    assert_eq!(body["data"]["evaluation"]["grammar"], "Unable to evaluate");
    assert_eq!(body["data"]["evaluation"]["score"], 5);

    let (status, summary) = app.get("/api/practice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["data"]["totalSessions"], 2);
    assert_eq!(summary["data"]["averageScore"], 6.5);
    assert_eq!(summary["data"]["todaySessions"].as_array().unwrap().len(), 2);
    assert_eq!(summary["data"]["todaySessions"][1]["type"], "idiom");

    let (status, _) = app
        .post("/api/practice", json!({"userSentence": "x", "targetWord": "y", "type": "grammar"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sentence_evaluation_always_answers() {
    let app = TestApp::new();
    app.mock.push_success(r#"{"score": 4, "feedback": "Well used.", "suggestions": []}"#);
    app.mock.push_error("quota exceeded");

    let (status, body) = app
        .post("/api/evaluate-sentence", json!({"word": "Laconic", "sentence": "His laconic reply said it all.", "wordMeaning": "brief"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"score": 4, "feedback": "Well used.", "suggestions": []}));

    let (status, body) = app
        .post("/api/evaluate-sentence", json!({"word": "Laconic", "sentence": "He was laconic."}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 3);
    assert_eq!(
        body["feedback"],
        "Unable to evaluate at the moment, but great job on creating your own example!"
    );
}

#[tokio::test]
async fn idiom_attempts_mark_mastery() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/idioms").await;
    let idiom_id = body["data"][0]["id"].as_str().unwrap().to_string();

    app.mock.push_success(r#"{"isCorrect": true, "feedback": "Natural usage.", "score": 85}"#);
    let (status, body) = app
        .post("/api/evaluate-idiom", json!({"idiomId": idiom_id, "userSentence": "A joke broke the ice."}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["evaluation"]["isCorrect"], true);
    assert_eq!(body["evaluation"]["score"], 85);

    let (_, body) = app.get("/api/idioms").await;
    let idiom = &body["data"][0];
    assert_eq!(idiom["mastered"], true);
    assert_eq!(idiom["practiced"], true);
    assert_eq!(idiom["userSentence"], "A joke broke the ice.");

    let (status, _) = app
        .post("/api/evaluate-idiom", json!({"idiomId": "missing", "userSentence": "Anything."}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn news_items_can_be_marked_read() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/news").await;
    let news_id = body["data"][2]["id"].as_str().unwrap().to_string();

    let (status, body) = app.post("/api/news", json!({"newsId": news_id, "updates": {"isRead": true}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News item updated successfully");
    assert_eq!(body["data"]["isRead"], true);
}

#[tokio::test]
async fn short_fact_batches_are_padded() {
    let app = TestApp::new();
    app.mock.push_success(
        r#"[{"title": "Kaziranga National Park", "description": "Home of the one-horned rhinoceros.", "category": "Geography", "importance": "high", "difficulty": "easy", "tags": ["wildlife"]},
            {"title": "Article 370", "description": "Abrogated in 2019.", "category": "Polity"}]"#,
    );

    let (status, body) = app.get("/api/daily-gk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Daily GK facts generated successfully");
    let facts = body["data"].as_array().unwrap();
    assert_eq!(facts.len(), 5);
    assert_eq!(facts[0]["source"], "AI Generated");
    assert_eq!(facts[1]["importance"], "medium");
    assert_eq!(facts[2]["title"], "Supreme Court of India");

    let fact_id = facts[0]["id"].as_str().unwrap().to_string();
    let (_, body) = app.post("/api/daily-gk", json!({"factId": fact_id, "updates": {"learned": true}})).await;
    assert_eq!(body["message"], "Fact updated successfully");
    assert_eq!(body["data"]["learned"], true);
}

#[tokio::test]
async fn progress_tracks_tasks_and_resets() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/progress", json!({"task": "vocabulary", "wordsLearned": 10})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["today"]["vocabulary"], true);
    assert_eq!(body["data"]["stats"]["totalWords"], 10);
    assert_eq!(body["data"]["stats"]["streakDays"], 0);

    for task in ["idioms", "news", "dailyGk"] {
        let (status, _) = app.post("/api/progress", json!({"task": task})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.get("/api/progress").await;
    assert_eq!(body["data"]["stats"]["streakDays"], 1);
    assert_eq!(body["data"]["stats"]["weeklyGoal"], 28);
    assert_eq!(body["data"]["today"]["practice"], false);
    assert!(body["data"]["today"]["completedAt"].is_string());

    let (_, body) = app.get("/api/progress/history?days=7").await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 7);
    assert_eq!(history[6]["completed"], 4);
    assert_eq!(history[6]["total"], 5);
    assert_eq!(history[0]["completed"], 0);

    let (_, body) = app.get("/api/progress/export").await;
    assert_eq!(body["data"]["progressHistory"].as_array().unwrap().len(), 90);
    assert_eq!(body["data"]["userStats"]["totalWords"], 10);

    let (status, _) = app.post("/api/progress", json!({"task": "sleep"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.post("/api/progress", json!({"completed": true})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete("/api/progress").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/progress").await;
    assert_eq!(body["data"]["today"]["vocabulary"], false);
    assert_eq!(body["data"]["stats"]["totalWords"], 0);
}

#[tokio::test]
async fn health_reports_backends() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "provider": "mock", "storage": "memory"}));
}

#[tokio::test]
async fn file_backed_content_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = TestApp::with_store(Arc::new(FileStore::new(dir.path())));
    let (_, body) = first.get("/api/vocabulary").await;
    let stored = ids(&body["data"]);
    assert!(dir.path().join("vocabulary.json").exists());

    let second = TestApp::with_store(Arc::new(FileStore::new(dir.path())));
    let (_, body) = second.get("/api/vocabulary").await;
    assert_eq!(body["message"], "Today's vocabulary already generated");
    assert_eq!(ids(&body["data"]), stored);
    assert_eq!(second.mock.call_count(), 0);
}

#[tokio::test]
async fn corrupt_data_file_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vocabulary.json"), "{ definitely not an array").unwrap();

    let app = TestApp::with_store(Arc::new(FileStore::new(dir.path())));
    let (status, body) = app.get("/api/vocabulary").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please try again later");
    assert_eq!(app.mock.call_count(), 0);
}
