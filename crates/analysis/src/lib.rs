//! LLM-backed code assistance and repository analysis.
//!
//! - `assistant`: retrieval-augmented code generation, code review and Q&A
//! - `worker`: clone, index and document a Git repository end to end
//! - `graph`: parse and sanitize Mermaid diagram JSON emitted by the model
//! - `status`: job status file polled by external tooling

pub mod assistant;
pub mod docs;
pub mod generator;
pub mod graph;
pub mod repo;
pub mod status;
pub mod worker;

pub use assistant::{Assistant, BAD_PRACTICES_COLLECTION, PRACTICES_COLLECTION};
pub use docs::{generate_all, GeneratedDocs};
pub use generator::Generator;
pub use graph::{parse_graph, sanitize_mermaid, GraphResult};
pub use repo::{clone_repository, repo_name, CloneOutcome};
pub use status::{AnalysisResult, JobState, JobStatus, StatusFile};
pub use worker::{Analyzer, DOCUMENTATION_QUERY, DOCUMENTATION_TOP_K};
