//! Article chunks, articles, and the pinned retrieval program version.
//!
//! An [`Article`] is the logical document a citation refers to; an
//! [`ArticleChunk`] is the atomic unit the corpus store persists and
//! embeds. `path` is the grouping key — see [`group_into_articles`] in
//! `lighthouse-corpus`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata recorded on every chunk by the external indexer.
///
/// The core only reads these fields (for reporting/replay); it never
/// writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source repository slug the article was indexed from.
    pub repo_slug: String,
    /// Commit SHA at index time.
    pub commit_sha: String,
    /// When the indexer wrote this chunk.
    pub indexed_at: chrono::DateTime<chrono::Utc>,
    /// Identifier of the indexer run that produced this chunk.
    pub index_run_id: String,
    /// Pinned `(chat_model, embedding_model, dimensions, chunker)` tuple,
    /// rendered as a string. See [`RetrievalProgramVersion`].
    pub retrieval_program_version: String,
}

impl ChunkMetadata {
    /// Metadata to use when the store returns a chunk missing optional
    /// fields. Keeps `fetch_by_paths`/`similarity_search` callers from
    /// having to special-case partially-populated rows.
    pub fn unknown() -> Self {
        Self {
            repo_slug: "unknown".to_string(),
            commit_sha: "unknown".to_string(),
            indexed_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            index_run_id: "unknown".to_string(),
            retrieval_program_version: "unknown".to_string(),
        }
    }
}

/// Pinned tuple of embedding model, dimensionality, and chunker identity.
///
/// Rendered into [`ChunkMetadata::retrieval_program_version`] and into the
/// provenance of every [`crate::answer::GroundedAnswer`], enabling replay
/// and drift detection by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalProgramVersion {
    /// Chat/completion model identifier.
    pub chat_model: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Embedding vector dimensionality.
    pub embedding_dimensions: usize,
    /// Identifier of the chunking strategy used at index time (opaque to
    /// the core; passed through unchanged).
    pub chunker_id: String,
}

impl fmt::Display for RetrievalProgramVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chat_model, self.embedding_model, self.embedding_dimensions, self.chunker_id
        )
    }
}

/// An embedded fragment of an article — the retrieval unit of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleChunk {
    /// Stable chunk identifier.
    pub id: String,
    /// File path within the corpus, e.g. `billing/multi-currency.md`.
    /// The grouping key: an article is the ordered concatenation of all
    /// chunks sharing this path.
    pub path: String,
    /// Section heading within the article, if any.
    pub section: Option<String>,
    /// Human-readable article title.
    pub title: Option<String>,
    /// Chunk body text.
    pub body: String,
    /// Dense embedding vector, fixed dimensionality `D`.
    pub embedding: Vec<f32>,
    /// Indexer-provided metadata.
    pub metadata: ChunkMetadata,
}

/// A logical help document, obtained by grouping chunks by `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Corpus path — the stable business identifier cited in answers.
    pub path: String,
    /// Title of a representative chunk, if any.
    pub title: Option<String>,
    /// Ordered concatenation of all chunk bodies sharing `path`.
    pub content: String,
    /// Best similarity score from a search result, or `1.0` for a direct
    /// fetch.
    pub similarity: f32,
    /// Metadata of a representative chunk.
    pub metadata: ChunkMetadata,
}
