use docbrief::{config::Config, gateway, processing::DocumentService};

fn local_config() -> Config {
    // Defaults point at a local Ollama runtime.
    Config::from_env().expect("configuration loads from defaults")
}

#[tokio::test]
#[ignore = "Requires live Ollama embeddings"]
async fn live_ollama_embedding_roundtrip() {
    let client = gateway::client_for(&local_config()).expect("client builds");
    let vector = client
        .embed("docbrief live embedding")
        .await
        .expect("failed to request embedding from provider");
    assert!(!vector.is_empty(), "expected a non-empty embedding vector");
}

#[tokio::test]
#[ignore = "Requires live Ollama chat"]
async fn live_ollama_summarize_roundtrip() {
    let service = DocumentService::new(&local_config()).expect("service builds");
    let outcome = service
        .summarize_document(
            "Docbrief accepts a pasted document or a PDF, produces a structured summary, \
             and answers follow-up questions strictly from the document's content.",
        )
        .await
        .expect("failed to summarize against live provider");
    assert!(!outcome.summary.is_empty());
    assert_eq!(outcome.chunks_total, 1);
}
