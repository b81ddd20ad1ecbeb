//! Catalog contents and per-model schema selection

use cluezy_config::{ToolEndpoints, ToolsConfig};
use cluezy_core::traits::tools::{ToolError, ToolExecutor, ToolPolicy};
use cluezy_core::ToolOutput;
use cluezy_tools::ToolRegistry;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry(base: &str) -> ToolRegistry {
    let config = ToolsConfig {
        serper_api_key: Some("serper-1".into()),
        endpoints: ToolEndpoints::all(base),
        ..Default::default()
    };
    ToolRegistry::new(config).unwrap()
}

#[test]
fn test_catalog_has_twelve_tools() {
    let registry = registry("http://unused");
    assert_eq!(
        registry.names(),
        vec![
            "search",
            "acadamicSearch",
            "retrieve",
            "videoSearch",
            "ask_question",
            "weather",
            "datetime",
            "youtubeVideoAnalysis",
            "productSearch",
            "pdfSearch",
            "docSearch",
            "pptSearch",
        ]
    );
}

#[test]
fn test_policies() {
    let tools = registry("http://unused").list_tools("openai:gpt-4o").unwrap();
    let policy = |name: &str| tools.iter().find(|t| t.name == name).unwrap().policy;

    assert_eq!(policy("acadamicSearch"), ToolPolicy::Rethrow);
    assert_eq!(policy("youtubeVideoAnalysis"), ToolPolicy::Rethrow);
    assert_eq!(policy("ask_question"), ToolPolicy::Interactive);
    assert_eq!(policy("search"), ToolPolicy::Contained);
    assert_eq!(policy("pdfSearch"), ToolPolicy::Contained);
}

#[test]
fn test_reasoning_models_get_strict_search_schema() {
    let registry = registry("http://unused");
    let schema_of = |model: &str| {
        registry
            .list_tools(model)
            .unwrap()
            .into_iter()
            .find(|t| t.name == "search")
            .unwrap()
            .parameters
    };

    let standard = schema_of("openai:gpt-4o-mini");
    let strict = schema_of("openai:o3-mini");

    assert_eq!(standard["required"], json!(["query"]));
    assert_eq!(strict["additionalProperties"], json!(false));
    assert_eq!(strict["required"].as_array().unwrap().len(), 5);
}

#[test]
fn test_malformed_model_fails_construction() {
    let err = registry("http://unused").list_tools("o3-mini").unwrap_err();
    assert!(matches!(err, ToolError::InvalidParameters(_)));
}

#[tokio::test]
async fn test_contained_tool_returns_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let out = registry(&server.uri())
        .execute_tool("videoSearch", json!({ "query": "rust" }))
        .await
        .unwrap();

    let ToolOutput::Error { tool_name, result } = out else {
        panic!("expected error payload");
    };
    assert_eq!(tool_name, "videoSearch");
    assert!(result.error.contains("502"));
}

#[tokio::test]
async fn test_rethrow_tool_propagates() {
    let server = MockServer::start().await;
    let err = registry(&server.uri())
        .execute_tool("acadamicSearch", json!({ "query": "transformers" }))
        .await
        .unwrap_err();
    // no EXA key configured
    assert!(matches!(err, ToolError::Upstream(_)));
}

#[tokio::test]
async fn test_missing_key_is_contained_for_search() {
    let out = registry("http://unused")
        .execute_tool("search", json!({ "query": "rust" }))
        .await
        .unwrap();
    assert_eq!(out, ToolOutput::error("search", "TAVILY_API_KEY is not set"));
}
