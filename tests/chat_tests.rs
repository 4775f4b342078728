//! Query classification and chat enrichment through the public API.

use std::sync::Arc;

use integrations_dataforseo::chat::{ChatAssistant, ChatMessage, ChatRequest};
use integrations_dataforseo::insights::Locale;
use integrations_dataforseo::mocks::{MockResponse, MockTransport, ScriptedGenerator};
use integrations_dataforseo::resilience::{ResilienceConfig, RetryConfig};
use integrations_dataforseo::{
    detect_query_type, extract_entities, DataForSeoClient, DataForSeoConfig, QueryType,
    SeoInsights,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn insights(transport: Arc<MockTransport>) -> SeoInsights {
    let client = DataForSeoClient::builder()
        .config(
            DataForSeoConfig::builder()
                .login("user@example.com")
                .password("0123456789abcdef")
                .build(),
        )
        .resilience_config(
            ResilienceConfig::new().with_retry(RetryConfig::new().with_max_attempts(1)),
        )
        .transport(transport)
        .build()
        .expect("Failed to build client");
    SeoInsights::new(client)
}

#[test]
fn test_detects_spanish_questions() {
    assert_eq!(
        detect_query_type("¿Cuál es el search volume de esta keyword?"),
        QueryType::Keyword
    );
    assert_eq!(
        detect_query_type("¿cómo está mi dominio example.com?"),
        QueryType::Domain
    );
    assert_eq!(detect_query_type("Buenos días"), QueryType::General);
}

#[test]
fn test_extracts_entities() {
    let entities =
        extract_entities(r#"Compara "zapatillas running" en Buenos Aires con https://www.Example.com/shop"#);

    assert_eq!(entities.keywords, vec!["zapatillas running"]);
    assert_eq!(entities.domains, vec!["example.com"]);
    assert_eq!(entities.locations, vec!["Buenos Aires"]);
}

#[tokio::test]
async fn test_domain_question_carries_live_data() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_response(MockResponse::task_result(json!([
        {"items": [{"keyword": "example", "rank_group": 1, "search_volume": 9000}]}
    ])));
    let generator = ScriptedGenerator::replying("Tu dominio va bien.");
    let assistant = ChatAssistant::new(insights(transport.clone()), generator);

    let reply = assistant
        .respond(
            ChatRequest::new("¿cómo está mi dominio example.com?")
                .with_history(vec![ChatMessage::user("Hola"), ChatMessage::model("¡Hola!")]),
        )
        .await
        .unwrap();

    assert!(reply.success);
    assert_eq!(reply.message, "Tu dominio va bien.");

    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["dataForSEO"]["domain"], "example.com");
    assert_eq!(json["dataForSEO"]["rankedKeywords"][0]["keyword"], "example");

    let body = transport.last_request().unwrap().json();
    assert_eq!(body[0]["target"], "example.com");
}

#[tokio::test]
async fn test_prompt_header_follows_locale() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_response(MockResponse::task_result(json!([
        {"keyword": "rust", "search_volume": 10}
    ])));
    let generator = Arc::new(ScriptedGenerator::replying("done"));
    let assistant = ChatAssistant::new(
        insights(transport).with_locale(Locale::En),
        generator.clone(),
    );

    assistant
        .respond(ChatRequest::new("keyword:rust volume please"))
        .await
        .unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("keyword:rust volume please\n\n[LIVE SEO DATA]\n"));
}

#[tokio::test]
async fn test_failing_generator_returns_apology() {
    let assistant = ChatAssistant::new(
        insights(Arc::new(MockTransport::new())),
        ScriptedGenerator::failing(),
    );

    let reply = assistant.respond(ChatRequest::new("Hola")).await.unwrap();

    assert!(!reply.success);
    assert!(reply.live_data.is_none());
    assert!(reply.message.starts_with("Lo siento"));
}
