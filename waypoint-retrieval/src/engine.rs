//! RetrievalAdapter: search, expand, pack, score.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, Instrument};
use waypoint_core::cancellation::CancellationToken;
use waypoint_core::config::RetrievalConfig;
use waypoint_core::intent::Intent;
use waypoint_core::models::{RagChunk, RouterResponse, TaskKind, WebResult};
use waypoint_core::traits::{IChunkLookup, IVectorStore, IWebSearchProvider, VectorFilter};
use waypoint_embeddings::similarity::is_zero;
use waypoint_embeddings::EmbeddingEngine;
use waypoint_observability::retrieval_span;
use waypoint_observability::tracing_setup::events;
use waypoint_tokens::TokenCounter;

use crate::budget::{self, PackedContext};
use crate::evidence::Evidence;
use crate::expansion::HierarchyExpander;
use crate::index::InMemoryChunkIndex;
use crate::instruction::select_task;
use crate::scoring;
use crate::search::{search_web, VectorSearch};

/// Evidence retrieval over injected collaborators. Holds no per-request
/// state, so concurrent requests share one adapter.
pub struct RetrievalAdapter {
    config: RetrievalConfig,
    engine: Arc<EmbeddingEngine>,
    store: Arc<dyn IVectorStore>,
    lookup: Arc<dyn IChunkLookup>,
    web: Option<Arc<dyn IWebSearchProvider>>,
    counter: TokenCounter,
}

impl RetrievalAdapter {
    pub fn new(
        config: RetrievalConfig,
        engine: Arc<EmbeddingEngine>,
        store: Arc<dyn IVectorStore>,
        lookup: Arc<dyn IChunkLookup>,
    ) -> Self {
        Self {
            config,
            engine,
            store,
            lookup,
            web: None,
            counter: TokenCounter::default(),
        }
    }

    /// Adapter backed by one in-memory index for both search and lookup.
    pub fn in_memory(
        config: RetrievalConfig,
        engine: Arc<EmbeddingEngine>,
        index: Arc<InMemoryChunkIndex>,
    ) -> Self {
        let store: Arc<dyn IVectorStore> = index.clone();
        let lookup: Arc<dyn IChunkLookup> = index;
        Self::new(config, engine, store, lookup)
    }

    /// Consult `provider` for `web_search` intents.
    pub fn with_web_search(mut self, provider: Arc<dyn IWebSearchProvider>) -> Self {
        self.web = Some(provider);
        self
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn has_web_search(&self) -> bool {
        self.web.is_some()
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    /// Chunks for `query` ranked by score, at most `top_k`. Empty when the
    /// query embedding is degraded or the store fails.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        scope: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        let filter = VectorFilter {
            scope: scope.map(str::to_string),
            doc_ids: Vec::new(),
        };
        self.search_filtered(query, top_k, &filter, cancel).await
    }

    /// `search` with an explicit filter.
    pub async fn search_filtered(
        &self,
        query: &str,
        top_k: usize,
        filter: &VectorFilter,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let embedded = self.engine.embed_with_cancel(query, cancel).await;
        if embedded.degraded || is_zero(&embedded.vector) {
            debug!("query embedding unavailable, skipping vector search");
            return Vec::new();
        }

        VectorSearch {
            store: self.store.as_ref(),
            lookup: self.lookup.as_ref(),
            counter: &self.counter,
            timeout: self.timeout(),
        }
        .run(&embedded.vector, top_k, filter, cancel)
        .await
    }

    /// Add siblings and parents around `chunks`. Failures return `chunks`
    /// unchanged.
    pub async fn expand_hierarchy(
        &self,
        chunks: &[RagChunk],
        neighbors: usize,
        include_parents: bool,
        cancel: Option<&CancellationToken>,
    ) -> Vec<RagChunk> {
        HierarchyExpander {
            lookup: self.lookup.as_ref(),
            counter: &self.counter,
            timeout: self.timeout(),
            sibling_decay: self.config.sibling_decay,
            parent_decay: self.config.parent_decay,
        }
        .expand(chunks, neighbors, include_parents, cancel)
        .await
    }

    pub fn pack_context(&self, chunks: &[RagChunk], budget_tokens: usize) -> PackedContext {
        budget::pack(chunks, budget_tokens)
    }

    pub fn confidence(&self, chunks: &[RagChunk]) -> f64 {
        scoring::confidence(chunks)
    }

    pub fn coverage(&self, chunks: &[RagChunk], web_results: &[WebResult], task: TaskKind) -> f64 {
        scoring::coverage(chunks, web_results.len(), task)
    }

    /// Web results for `query`; empty without a provider.
    pub async fn web_search(&self, query: &str, cancel: Option<&CancellationToken>) -> Vec<WebResult> {
        match &self.web {
            Some(provider) => {
                search_web(
                    provider.as_ref(),
                    query,
                    self.config.web_top_k,
                    self.timeout(),
                    cancel,
                )
                .await
            }
            None => Vec::new(),
        }
    }

    /// Retrieve, expand, and pack evidence for a routed request.
    ///
    /// Document retrieval runs for `rag_query`, `edit_request`, and
    /// `editor_write`; `rag_query` is restricted to the slot's target
    /// documents when any are named. Web search runs for `web_search`.
    pub async fn assemble(
        &self,
        response: &RouterResponse,
        query: &str,
        scope: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Evidence {
        let classification = &response.classification;
        let span = retrieval_span!(classification.intent, self.config.top_k);
        async {
            let task = select_task(classification, query);
            let budget_tokens = self.config.budget_tokens;
            let mut evidence = Evidence::none(task, budget_tokens);

            let wants_docs = matches!(
                classification.intent,
                Intent::RagQuery | Intent::EditRequest | Intent::EditorWrite
            );
            if wants_docs {
                let filter = VectorFilter {
                    scope: scope.map(str::to_string),
                    doc_ids: if classification.intent == Intent::RagQuery {
                        classification.slots.target_docs.clone()
                    } else {
                        Vec::new()
                    },
                };
                let hits = self
                    .search_filtered(query, self.config.top_k, &filter, cancel)
                    .await;
                let expanded = self
                    .expand_hierarchy(&hits, self.config.neighbors, self.config.include_parents, cancel)
                    .await;
                evidence.expanded = expanded.len().saturating_sub(hits.len());

                let packed = self.pack_context(&expanded, budget_tokens);
                evidence.candidates = packed.candidates;
                evidence.tokens_used = packed.tokens_used;
                evidence.truncated = packed.truncated;
                evidence.chunks = packed.chunks;
            }

            if classification.intent == Intent::WebSearch {
                evidence.web_results = self.web_search(query, cancel).await;
            }

            evidence.confidence = scoring::confidence(&evidence.chunks);
            evidence.coverage =
                scoring::coverage(&evidence.chunks, evidence.web_results.len(), task);

            events::evidence_packed(
                evidence.candidates,
                evidence.chunks.len(),
                evidence.tokens_used,
                budget_tokens,
            );
            evidence
        }
        .instrument(span)
        .await
    }
}
