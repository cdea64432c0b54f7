//! Integration tests for Paper Assistant
//!
//! These tests drive the public API against a local mock HTTP server standing
//! in for both the arXiv export API and the inference API.

use mockito::{Matcher, Server, ServerGuard};
use paper_assistant::config::Config;
use paper_assistant::mcp::ToolRegistry;
use paper_assistant::sources::{ArxivSource, FetchError, PaperSource};
use paper_assistant::{AssistantError, ResearchAssistant};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const TOPIC: &str = "machine learning and healthcare";

fn entry(title: &str, authors: &[&str], published: &str, summary: &str) -> String {
    let authors: String = authors
        .iter()
        .map(|name| format!("    <author>\n      <name>{}</name>\n    </author>\n", name))
        .collect();
    format!(
        r#"  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <updated>{published}</updated>
    <published>{published}</published>
    <title>{title}</title>
    <summary>{summary}</summary>
{authors}    <link href="http://arxiv.org/abs/2401.00001v1" rel="alternate" type="text/html"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
"#
    )
}

fn feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=all:test</title>
  <id>http://arxiv.org/api/test</id>
  <updated>2024-01-01T00:00:00-05:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">{}</opensearch:totalResults>
{}</feed>
"#,
        entries.len(),
        entries.concat()
    )
}

fn five_papers() -> Vec<String> {
    (1..=5)
        .map(|i| {
            entry(
                &format!("Paper number {}", i),
                &["Ada Lovelace", "Alan Turing"],
                &format!("2024-0{}-15T12:00:00Z", i),
                &format!("Abstract {} about clinical prediction models.", i),
            )
        })
        .collect()
}

fn source_for(server: &ServerGuard) -> ArxivSource {
    ArxivSource::with_base_url(format!("{}/api/query", server.url()), Duration::from_secs(5))
        .expect("client should build")
}

fn config_for(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.arxiv.base_url = format!("{}/api/query", server.url());
    config.inference.base_url = server.url();
    config.inference.token = Some("test-token".to_string());
    config.http.timeout_secs = 5;
    config
}

fn arxiv_query(topic: &str, max_results: usize) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("search_query".into(), format!("all:{}", topic)),
        Matcher::UrlEncoded("start".into(), "0".into()),
        Matcher::UrlEncoded("max_results".into(), max_results.to_string()),
    ])
}

#[tokio::test]
async fn test_fetch_returns_entries_in_feed_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/query")
        .match_query(arxiv_query(TOPIC, 5))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed(&five_papers()))
        .create_async()
        .await;

    let papers = source_for(&server).fetch_papers(TOPIC, 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(papers.len(), 5);
    for (i, paper) in papers.iter().enumerate() {
        assert_eq!(paper.title, format!("Paper number {}", i + 1));
        assert_eq!(paper.published, format!("2024-0{}-15T12:00:00Z", i + 1));
        assert_eq!(paper.authors, vec!["Ada Lovelace", "Alan Turing"]);
    }
}

#[tokio::test]
async fn test_fetch_keeps_every_author_in_order() {
    let names = ["A. One", "B. Two", "C. Three", "D. Four", "E. Five", "F. Six", "G. Seven"];
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed(&[entry("Many authors", &names, "2023-11-02T08:30:00Z", "Text.")]))
        .create_async()
        .await;

    let papers = source_for(&server).fetch_papers("authors", 1).await.unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].authors, names);
    assert_eq!(papers[0].author_line(), names.join(", "));
}

#[tokio::test]
async fn test_fetch_empty_feed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed(&[]))
        .create_async()
        .await;

    let papers = source_for(&server).fetch_papers("nothing matches", 5).await.unwrap();
    assert!(papers.is_empty());
}

#[tokio::test]
async fn test_fetch_truncates_oversized_feed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(arxiv_query(TOPIC, 2))
        .with_status(200)
        .with_body(feed(&five_papers()))
        .create_async()
        .await;

    let papers = source_for(&server).fetch_papers(TOPIC, 2).await.unwrap();
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[1].title, "Paper number 2");
}

#[tokio::test]
async fn test_error_status_is_reported_or_swallowed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(2)
        .create_async()
        .await;

    let source = source_for(&server);
    let strict = source.fetch_papers(TOPIC, 5).await;
    assert!(matches!(strict, Err(FetchError::Status(503))));

    let legacy = source.fetch_papers_or_empty(TOPIC, 5).await.unwrap();
    assert!(legacy.is_empty());
}

#[tokio::test]
async fn test_missing_summary_is_parse_error() {
    let broken = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>No abstract</title>
    <published>2024-01-01T00:00:00Z</published>
    <author><name>Someone</name></author>
  </entry>
</feed>
"#;
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(broken)
        .expect(2)
        .create_async()
        .await;

    let source = source_for(&server);
    assert!(matches!(
        source.fetch_papers("x", 1).await,
        Err(FetchError::Parse(_))
    ));
    // Parse failures are not folded into the empty result
    assert!(matches!(
        source.fetch_papers_or_empty("x", 1).await,
        Err(FetchError::Parse(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<feed><entry><title>unterminated")
        .create_async()
        .await;

    let result = source_for(&server).fetch_papers("x", 1).await;
    assert!(matches!(result, Err(FetchError::Parse(_))));
}

#[tokio::test]
async fn test_zero_max_results_rejected_without_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = source_for(&server).fetch_papers(TOPIC, 0).await;
    assert!(matches!(result, Err(FetchError::InvalidRequest(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_preview_is_first_500_characters() {
    let long_summary = "é".repeat(300) + &"a".repeat(400);
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed(&[entry("Long", &["X"], "2024-01-01T00:00:00Z", &long_summary)]))
        .create_async()
        .await;

    let papers = source_for(&server).fetch_papers("long", 1).await.unwrap();
    let preview = papers[0].summary_preview(500);
    assert_eq!(preview.chars().count(), 500);
    assert!(papers[0].summary.starts_with(preview));
}

#[tokio::test]
async fn test_summarize_with_hosted_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/facebook/bart-large-cnn")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "inputs": "A long abstract about models.",
            "parameters": { "do_sample": false }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"summary_text": "Short summary."}]"#)
        .create_async()
        .await;

    let assistant = ResearchAssistant::from_config(&config_for(&server)).unwrap();
    let summary = assistant
        .summarize_paper("A long abstract about models.")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(summary, "Short summary.");
}

#[tokio::test]
async fn test_summarizer_error_status_propagates() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/facebook/bart-large-cnn")
        .with_status(500)
        .with_body(r#"{"error": "model crashed"}"#)
        .create_async()
        .await;

    let assistant = ResearchAssistant::from_config(&config_for(&server)).unwrap();
    let err = assistant.summarize_paper("Some text.").await.unwrap_err();
    assert!(err.to_string().contains("model crashed"));
}

#[tokio::test]
async fn test_answer_with_span_from_hosted_model() {
    let context = "We evaluate on three hospitals. The model achieves 91% accuracy overall.";
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/deepset/bert-base-cased-squad2")
        .match_body(Matcher::PartialJson(json!({
            "inputs": { "question": "How accurate is the model?", "context": context }
        })))
        .with_status(200)
        .with_body(r#"{"answer": "91%", "start": 51, "end": 54, "score": 0.87}"#)
        .create_async()
        .await;

    let assistant = ResearchAssistant::from_config(&config_for(&server)).unwrap();
    let span = assistant
        .answer_question_with_span("How accurate is the model?", context)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(span.answer, "91%");
    assert_eq!(span.exact_part, "91%");
    assert_eq!((span.start, span.end), (51, 54));
    assert_eq!(span.score, Some(0.87));
}

#[tokio::test]
async fn test_empty_question_makes_no_model_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let assistant = ResearchAssistant::from_config(&config_for(&server)).unwrap();
    let result = assistant.answer_question_with_span("", "context").await;

    assert!(matches!(result, Err(AssistantError::EmptyQuestion)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_then_classify() {
    let entries = vec![
        entry("P1", &["A"], "2024-01-01T00:00:00Z", "We Propose a new model."),
        entry("P2", &["B"], "2024-01-02T00:00:00Z", "Our approach uses attention."),
        entry("P3", &["C"], "2024-01-03T00:00:00Z", "Results show improvements."),
        entry("P4", &["D"], "2024-01-04T00:00:00Z", "Unrelated text."),
    ];
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(arxiv_query(TOPIC, 5))
        .with_status(200)
        .with_body(feed(&entries))
        .create_async()
        .await;

    let assistant = ResearchAssistant::offline(&config_for(&server)).unwrap();
    let papers = assistant.fetch_papers(TOPIC, 5).await.unwrap();
    let info = assistant.extract_key_information(&papers);

    assert_eq!(info.contributions, vec!["We Propose a new model."]);
    assert_eq!(info.methodologies, vec!["Our approach uses attention."]);
    assert_eq!(info.conclusions, vec!["Results show improvements."]);
}

#[tokio::test]
async fn test_tool_registry_round_trip() {
    let mut server = Server::new_async().await;
    let _arxiv = server
        .mock("GET", "/api/query")
        .match_query(arxiv_query("graph learning", 3))
        .with_status(200)
        .with_body(feed(&[entry(
            "Graphs",
            &["Q"],
            "2022-07-07T00:00:00Z",
            "We introduce a graph method.",
        )]))
        .create_async()
        .await;

    let assistant = Arc::new(ResearchAssistant::offline(&config_for(&server)).unwrap());
    let tools = ToolRegistry::from_assistant(assistant);
    assert_eq!(tools.len(), 4);
    for name in [
        "fetch_papers",
        "summarize_paper",
        "answer_question_with_span",
        "extract_key_information",
    ] {
        assert!(tools.get(name).is_some(), "missing tool {}", name);
    }

    let fetched = tools
        .get("fetch_papers")
        .unwrap()
        .handler
        .execute(json!({ "topic": "graph learning", "max_results": 3 }))
        .await
        .unwrap();
    assert_eq!(fetched["count"], 1);
    assert_eq!(fetched["papers"][0]["published"], "2022-07-07T00:00:00Z");

    let buckets = tools
        .get("extract_key_information")
        .unwrap()
        .handler
        .execute(json!({ "papers": fetched["papers"] }))
        .await
        .unwrap();
    assert_eq!(buckets["contributions"][0], "We introduce a graph method.");
    assert_eq!(buckets["methodologies"][0], "We introduce a graph method.");
    assert_eq!(buckets["conclusions"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_fetch_tool_swallows_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let assistant = Arc::new(ResearchAssistant::offline(&config_for(&server)).unwrap());
    let tools = ToolRegistry::from_assistant(assistant);
    let result = tools
        .get("fetch_papers")
        .unwrap()
        .handler
        .execute(json!({ "topic": TOPIC }))
        .await
        .unwrap();

    assert_eq!(result["count"], 0);
}
