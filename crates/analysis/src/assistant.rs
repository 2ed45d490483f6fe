//! Retrieval-augmented code generation, review and repository Q&A.

use crate::generator::Generator;
use archimind_core::AppResult;
use archimind_index::{Retriever, VectorStore};
use archimind_llm::extract_code_block;
use archimind_prompt::{CODE_GENERATE, CODE_REVIEW, REPO_ASK};

/// Collection of good-practice examples used for generation.
pub const PRACTICES_COLLECTION: &str = "practices";

/// Collection of anti-pattern examples used for review.
pub const BAD_PRACTICES_COLLECTION: &str = "bad_practices";

/// Couples retrieval with prompt-driven generation.
pub struct Assistant {
    generator: Generator,
    retriever: Retriever,
}

impl Assistant {
    pub fn new(generator: Generator, retriever: Retriever) -> Self {
        Self {
            generator,
            retriever,
        }
    }

    /// Generate code for `description`, conditioned on the `k` closest
    /// examples from the practices collection.
    ///
    /// Returns the body of the first fenced code block in the reply, or the
    /// trimmed reply when it has none.
    pub async fn generate_code(
        &self,
        store: &VectorStore,
        description: &str,
        k: usize,
    ) -> AppResult<String> {
        let context = self
            .retriever
            .query_collection(store, PRACTICES_COLLECTION, description, k)
            .await;

        let reply = self
            .generator
            .run(
                CODE_GENERATE,
                &[("prompt", description), ("context", context.as_str())],
            )
            .await?;

        Ok(extract_code_block(&reply))
    }

    /// Review `code` against the `k` closest anti-pattern examples.
    pub async fn review_code(
        &self,
        store: &VectorStore,
        code: &str,
        k: usize,
    ) -> AppResult<String> {
        let context = self
            .retriever
            .query_collection(store, BAD_PRACTICES_COLLECTION, code, k)
            .await;

        let reply = self
            .generator
            .run(CODE_REVIEW, &[("code", code), ("context", context.as_str())])
            .await?;

        Ok(reply.trim().to_string())
    }

    /// Answer `question` about the repository indexed in `collection`.
    pub async fn ask(
        &self,
        store: &VectorStore,
        collection: &str,
        question: &str,
        k: usize,
    ) -> AppResult<String> {
        let context = self
            .retriever
            .query_collection(store, collection, question, k)
            .await;

        let reply = self
            .generator
            .run(
                REPO_ASK,
                &[
                    ("repo", collection),
                    ("question", question),
                    ("context", context.as_str()),
                ],
            )
            .await?;

        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::RecordingClient;
    use archimind_core::config::{IndexSettings, LlmSettings};
    use archimind_index::embeddings::providers::TrigramProvider;
    use archimind_index::{EmbeddingProvider, Indexer};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup(reply: &str) -> (TempDir, Arc<RecordingClient>, Assistant, VectorStore) {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good");
        let bad = temp.path().join("bad");
        std::fs::create_dir_all(&good).unwrap();
        std::fs::create_dir_all(&bad).unwrap();
        std::fs::write(
            good.join("math.py"),
            "def add_numbers(a: int, b: int) -> int:\n    return a + b\n",
        )
        .unwrap();
        std::fs::write(
            bad.join("globals.py"),
            "total = 0\ndef add_numbers(a, b):\n    global total\n    total = a + b\n",
        )
        .unwrap();

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(TrigramProvider::new(128));
        let indexer = Indexer::new(embedder.clone(), &IndexSettings::default(), 4).unwrap();
        let mut store = VectorStore::in_memory().unwrap();
        indexer
            .index_directory(&mut store, &good, PRACTICES_COLLECTION)
            .await
            .unwrap();
        indexer
            .index_directory(&mut store, &bad, BAD_PRACTICES_COLLECTION)
            .await
            .unwrap();

        let client = RecordingClient::new(reply);
        let generator = Generator::new(
            client.clone(),
            &LlmSettings::default(),
            temp.path().join("prompts"),
        );
        let assistant = Assistant::new(generator, Retriever::new(embedder));
        (temp, client, assistant, store)
    }

    #[tokio::test]
    async fn test_generate_code_uses_practices_and_extracts_block() {
        let (_temp, client, assistant, store) =
            setup("Sure:\n```python\ndef add(a, b):\n    return a + b\n```").await;

        let code = assistant
            .generate_code(&store, "add two numbers", 3)
            .await
            .unwrap();

        assert_eq!(code, "def add(a, b):\n    return a + b");
        let prompts = client.prompts();
        let prompt = &prompts[0];
        assert!(prompt.contains("--- From: math.py ---"));
        assert!(!prompt.contains("globals.py"));
    }

    #[tokio::test]
    async fn test_review_code_uses_bad_practices() {
        let (_temp, client, assistant, store) = setup("  Avoid globals.  ").await;

        let review = assistant
            .review_code(&store, "def add_numbers(a, b): ...", 3)
            .await
            .unwrap();

        assert_eq!(review, "Avoid globals.");
        let prompts = client.prompts();
        let prompt = &prompts[0];
        assert!(prompt.contains("--- From: globals.py ---"));
        assert!(prompt.contains("def add_numbers(a, b): ..."));
    }

    #[tokio::test]
    async fn test_missing_collection_uses_placeholder() {
        let (_temp, client, assistant, store) = setup("answer").await;

        let answer = assistant
            .ask(&store, "unknown_repo", "Where is auth handled?", 5)
            .await
            .unwrap();

        assert_eq!(answer, "answer");
        let prompts = client.prompts();
        let prompt = &prompts[0];
        assert!(prompt.contains("No repository context available."));
        assert!(prompt.contains("Where is auth handled?"));
    }
}
