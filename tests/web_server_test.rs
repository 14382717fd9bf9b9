use axum::http::StatusCode;
use axum_test::TestServer;
use loinho::web_server::router;
use loinho::{GeminiClient, Generator};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_server(gemini: &MockServer) -> TestServer {
    let client = GeminiClient::new(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        gemini.uri(),
    )
    .unwrap();
    // Integration tests run from the package root.
    TestServer::new(router(Generator::new(client), "templates", "static")).unwrap()
}

fn text_reply(text: &str) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
}

fn poem_request() -> Value {
    json!({
        "feature": "poem",
        "name": "Lan",
        "characteristics": "mắt cười",
        "poem_topic": "mùa thu"
    })
}

#[tokio::test]
async fn test_index_renders_catalog() {
    let gemini = MockServer::start().await;
    let server = test_server(&gemini);

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Gửi lời nhớ Nhung"));
    assert!(body.contains("data-feature=\"feng-shui\""));
    assert!(body.contains("Chúc buổi sáng"));
}

#[tokio::test]
async fn test_catalog_lists_both_categories() {
    let gemini = MockServer::start().await;
    let server = test_server(&gemini);

    let catalog: Value = server.get("/api/catalog").await.json();
    let categories = catalog["assistant_types"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["features"].as_array().unwrap().len(), 3);
    assert_eq!(categories[1]["features"].as_array().unwrap().len(), 6);
    assert_eq!(catalog["message_types"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_blank_name_is_a_bad_request() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    let server = test_server(&gemini);

    let response = server
        .post("/api/generate")
        .json(&json!({"feature": "message", "name": "   "}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Vui lòng nhập tên của nàng.");

    let state: Value = server.get("/api/state").await.json();
    assert_eq!(state["status"], "idle");
}

#[tokio::test]
async fn test_generate_chat_and_switch_category() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            &json!({"title": "Thu vàng", "poem": "Lá vàng rơi nhẹ bên thềm", "starters": ["x", "y", "z"]}).to_string(),
        )))
        .up_to_n_times(1)
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("Thu này có anh")))
        .mount(&gemini)
        .await;
    let server = test_server(&gemini);

    let state: Value = server.post("/api/generate").json(&poem_request()).await.json();
    assert_eq!(state["status"], "success");
    assert_eq!(state["loading"], false);
    assert_eq!(state["chat_enabled"], true);
    assert_eq!(state["response"]["title"], "Thu vàng");
    assert_eq!(state["transcript"].as_array().unwrap().len(), 1);

    let state: Value = server
        .post("/api/chat")
        .json(&json!({"message": "Hay quá"}))
        .await
        .json();
    let transcript = state["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1]["role"], "user");
    assert!(transcript[2]["content"]
        .as_str()
        .unwrap()
        .ends_with("Thu này có anh"));
    assert_eq!(state["chat_sending"], false);

    let state: Value = server
        .post("/api/category")
        .json(&json!({"assistant_type": "Practical"}))
        .await
        .json();
    assert_eq!(state["assistant_type"], "Practical");
    assert_eq!(state["status"], "idle");
    assert!(state["response"].is_null());
    assert!(state["transcript"].as_array().unwrap().is_empty());
    assert_eq!(state["chat_enabled"], false);
}

#[tokio::test]
async fn test_chat_without_session_conflicts() {
    let gemini = MockServer::start().await;
    let server = test_server(&gemini);

    let response = server
        .post("/api/chat")
        .json(&json!({"message": "Alo"}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_empty_chat_message_is_a_bad_request() {
    let gemini = MockServer::start().await;
    let server = test_server(&gemini);

    server
        .post("/api/chat")
        .json(&json!({"message": "  "}))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generation_failure_is_reported_in_state() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&gemini)
        .await;
    let server = test_server(&gemini);

    let state: Value = server
        .post("/api/generate")
        .json(&json!({"feature": "finance", "query": "Nên gửi tiết kiệm không?"}))
        .await
        .json();
    // Asking for a practical topic moves the panel to that category.
    assert_eq!(state["assistant_type"], "Practical");
    assert_eq!(state["status"], "error");
    assert_eq!(
        state["error"],
        "Không thể tạo nội dung lúc này. Vui lòng kiểm tra lại thông tin và thử lại sau."
    );
    assert_eq!(state["chat_enabled"], false);
}

#[tokio::test]
async fn test_incomplete_body_gets_json_error() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    let server = test_server(&gemini);

    let response = server
        .post("/api/generate")
        .json(&json!({"feature": "poem", "name": "Lan"}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("poem_topic"));

    server
        .post("/api/category")
        .json(&json!({"assistant_type": "Romantic"}))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// Mounts a slow advice reply so a second request lands while the first is in flight.
async fn mount_slow_advice(gemini: &MockServer) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_reply("Ngủ đủ giấc nhé."))
                .set_delay(Duration::from_millis(800)),
        )
        .expect(1)
        .mount(gemini)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_category_switch_refused_while_generating() {
    let gemini = MockServer::start().await;
    mount_slow_advice(&gemini).await;
    let server = test_server(&gemini);

    let first = async {
        server
            .post("/api/generate")
            .json(&json!({"feature": "health", "query": "Mất ngủ thì sao?"}))
            .await
    };
    let meanwhile = async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let switch = server
            .post("/api/category")
            .json(&json!({"assistant_type": "Creative"}))
            .expect_failure()
            .await;
        let state: Value = server.get("/api/state").await.json();
        let second = server
            .post("/api/generate")
            .json(&json!({"feature": "life", "query": "Nên đổi việc không?"}))
            .expect_failure()
            .await;
        (switch, state, second)
    };
    let (first, (switch, during, second)) = tokio::join!(first, meanwhile);

    switch.assert_status(StatusCode::CONFLICT);
    assert_eq!(during["status"], "loading");
    assert_eq!(during["loading"], true);
    second.assert_status(StatusCode::CONFLICT);

    let state: Value = first.json();
    assert_eq!(state["status"], "success");
    assert_eq!(state["assistant_type"], "Practical");
    assert_eq!(state["response"]["title"], "Tư vấn Sức khỏe");
}

#[tokio::test]
async fn test_generate_refused_while_generating() {
    let gemini = MockServer::start().await;
    mount_slow_advice(&gemini).await;
    let server = test_server(&gemini);

    let first = async {
        server
            .post("/api/generate")
            .json(&json!({"feature": "study", "query": "Học từ vựng thế nào?"}))
            .await
    };
    let second = async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        server
            .post("/api/generate")
            .json(&json!({"feature": "study", "query": "Học ngữ pháp thế nào?"}))
            .expect_failure()
            .await
    };
    let (first, second) = tokio::join!(first, second);

    second.assert_status(StatusCode::CONFLICT);
    let body: Value = second.json();
    assert!(body["error"].is_string());
    first.assert_status_ok();
}

#[tokio::test]
async fn test_chat_refused_while_sending() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            &json!({"title": "Đố vui", "instructions": "Hỏi và đáp", "openingLine": "Bắt đầu!"})
                .to_string(),
        )))
        .up_to_n_times(1)
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_reply("Câu tiếp theo nè"))
                .set_delay(Duration::from_millis(800)),
        )
        .expect(1)
        .mount(&gemini)
        .await;
    let server = test_server(&gemini);

    let state: Value = server
        .post("/api/generate")
        .json(&json!({"feature": "game", "name": "Lan", "game_idea": "đố vui"}))
        .await
        .json();
    assert_eq!(state["chat_enabled"], true);

    let first = async {
        server
            .post("/api/chat")
            .json(&json!({"message": "Chơi tiếp"}))
            .await
    };
    let meanwhile = async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let state: Value = server.get("/api/state").await.json();
        let second = server
            .post("/api/chat")
            .json(&json!({"message": "Nhanh lên"}))
            .expect_failure()
            .await;
        (state, second)
    };
    let (first, (during, second)) = tokio::join!(first, meanwhile);

    assert_eq!(during["chat_sending"], true);
    second.assert_status(StatusCode::CONFLICT);

    let state: Value = first.json();
    let transcript = state["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1]["content"], "Chơi tiếp");
    assert_eq!(state["chat_sending"], false);
}

#[tokio::test]
async fn test_static_files() {
    let gemini = MockServer::start().await;
    let server = test_server(&gemini);

    server.get("/static/app.js").await.assert_status_ok();
    server
        .get("/static/missing.js")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
