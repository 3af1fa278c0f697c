use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Embedding family. The dimension is fixed per kind by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    /// ComplEx graph embeddings.
    Complex,
    /// TransE graph embeddings.
    Transe,
    /// Text embeddings of node lexicalizations.
    Text,
    /// Node2Vec random-walk embeddings.
    Node2vec,
}

impl EmbeddingKind {
    pub const ALL: [EmbeddingKind; 4] = [
        EmbeddingKind::Complex,
        EmbeddingKind::Transe,
        EmbeddingKind::Text,
        EmbeddingKind::Node2vec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complex => "complex",
            Self::Transe => "transe",
            Self::Text => "text",
            Self::Node2vec => "node2vec",
        }
    }
}

impl fmt::Display for EmbeddingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complex" => Ok(Self::Complex),
            "transe" => Ok(Self::Transe),
            "text" => Ok(Self::Text),
            "node2vec" => Ok(Self::Node2vec),
            other => Err(format!("unknown embedding kind: {other}")),
        }
    }
}
