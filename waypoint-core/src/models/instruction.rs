use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::intent::Intent;

/// What the downstream generator is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Answer,
    WebAnswer,
    RagAnswer,
    Edit,
    Write,
    FactCheck,
    Summarize,
}

impl TaskKind {
    pub const ALL: [TaskKind; 7] = [
        Self::Answer,
        Self::WebAnswer,
        Self::RagAnswer,
        Self::Edit,
        Self::Write,
        Self::FactCheck,
        Self::Summarize,
    ];

    /// Default task for an intent.
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Ask | Intent::Other => Self::Answer,
            Intent::WebSearch => Self::WebAnswer,
            Intent::RagQuery => Self::RagAnswer,
            Intent::EditRequest => Self::Edit,
            Intent::EditorWrite => Self::Write,
        }
    }

    /// Writing-class tasks may lean on general knowledge, so thin evidence
    /// is a warning rather than an error.
    pub fn allows_low_coverage(self) -> bool {
        matches!(self, Self::Write | Self::Edit)
    }

    /// Tasks whose evidence should span more than one source.
    pub fn is_factual(self) -> bool {
        matches!(self, Self::FactCheck | Self::Summarize)
    }

    pub fn requires_evidence(self) -> bool {
        matches!(
            self,
            Self::WebAnswer | Self::RagAnswer | Self::FactCheck | Self::Summarize
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::WebAnswer => "web_answer",
            Self::RagAnswer => "rag_answer",
            Self::Edit => "edit",
            Self::Write => "write",
            Self::FactCheck => "fact_check",
            Self::Summarize => "summarize",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Plain,
    Diff,
    Patch,
}

/// A reference from the instruction to a piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextRef {
    Doc {
        /// Chunk id; must be among the chunks retrieved for this request.
        id: String,
        anchor: Option<String>,
        why: String,
        score: Option<f64>,
    },
    Web {
        /// Source URL.
        id: String,
        why: String,
        score: Option<f64>,
    },
}

impl ContextRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Doc { id, .. } | Self::Web { id, .. } => id,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Doc { score, .. } | Self::Web { score, .. } => *score,
        }
    }

    pub fn is_doc(&self) -> bool {
        matches!(self, Self::Doc { .. })
    }
}

/// Constraints the generator must respect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Policies {
    pub cite_every_claim: bool,
    pub no_external_sources: bool,
    pub max_tokens: usize,
    pub format: OutputFormat,
}

/// Signals carried alongside the instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Telemetry {
    pub route_conf: f64,
    pub rag_conf: f64,
    pub coverage: f64,
    pub total_tokens: usize,
}

/// The user-facing inputs of an instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstructionInputs {
    pub query: String,
    pub selection: Option<String>,
    /// Opaque tenant/partition key used for retrieval.
    pub scope: Option<String>,
}

/// The evidence bundle handed to the downstream generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Instruction {
    pub task: TaskKind,
    pub inputs: InstructionInputs,
    pub context_refs: Vec<ContextRef>,
    pub policies: Policies,
    pub telemetry: Telemetry,
}

impl Instruction {
    /// Ids of every `Doc` reference.
    pub fn doc_ref_ids(&self) -> impl Iterator<Item = &str> {
        self.context_refs
            .iter()
            .filter(|r| r.is_doc())
            .map(ContextRef::id)
    }
}
