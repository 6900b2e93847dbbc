//! Knowledge base lookup against a mocked retrieval client.

mod common;

use std::sync::Arc;

use bedrock_gate::{GateError, KnowledgeQuery, query_knowledge_base};
use common::MockRetrieval;

const KB_ID: &str = "GJAQ7CUOSJ";

#[tokio::test]
async fn returns_passages_in_service_order() {
    let mock = Arc::new(MockRetrieval::with_passages(&["first", "second", "third"]));
    let query = KnowledgeQuery::new(mock.clone(), KB_ID);

    let passages = query.retrieve("hydraulic pump pressure").await.unwrap();
    let texts: Vec<_> = passages.iter().map(|p| p.text()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn always_requests_three_results() {
    let mock = Arc::new(MockRetrieval::with_passages(&[]));
    let query = KnowledgeQuery::new(mock.clone(), KB_ID);

    let long = "long query ".repeat(200);
    for q in ["", "excavator", long.as_str()] {
        query.retrieve(q).await.unwrap();
    }

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    for (kb_id, request) in calls {
        assert_eq!(kb_id, KB_ID);
        assert_eq!(request.number_of_results(), 3);
    }
}

#[tokio::test]
async fn passes_raw_query_through() {
    let mock = Arc::new(MockRetrieval::with_passages(&["x"]));
    let query = KnowledgeQuery::new(mock.clone(), KB_ID);
    query.retrieve("  Tell me about <b>cranes</b>  ").await.unwrap();
    assert_eq!(mock.calls()[0].1.query(), "  Tell me about <b>cranes</b>  ");
}

#[tokio::test]
async fn errors_become_empty_list_in_lenient_mode() {
    let mock = Arc::new(MockRetrieval::failing(|| {
        GateError::ResourceNotFound("GJAQ7CUOSJ".into())
    }));
    let query = KnowledgeQuery::new(mock.clone(), KB_ID);

    assert!(query.retrieve_or_empty("excavator").await.is_empty());
    assert!(query_knowledge_base(&*mock, "excavator", KB_ID).await.is_empty());

    let err = query.retrieve("excavator").await.unwrap_err();
    assert!(matches!(err, GateError::ResourceNotFound(_)));
    assert!(!err.is_transient());
}
