//! In-memory chunk index implementing both the vector store and the chunk
//! lookup. Linear cosine scan; intended for small corpora and tests.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use waypoint_core::errors::RetrievalError;
use waypoint_core::models::RagChunk;
use waypoint_core::traits::{ChunkMetadata, IChunkLookup, IVectorStore, VectorFilter, VectorMatch};
use waypoint_embeddings::similarity::cosine_similarity;
use waypoint_embeddings::EmbeddingEngine;

#[derive(Debug, Clone)]
struct Entry {
    chunk: RagChunk,
    /// `None` for section chunks, which are reachable only as parents.
    vector: Option<Vec<f32>>,
    parent: Option<String>,
    scope: Option<String>,
}

/// Paragraph-level chunks with their enclosing sections.
#[derive(Debug, Default)]
pub struct InMemoryChunkIndex {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a searchable chunk. `parent` names a section added with `add_section`.
    pub fn add_chunk(
        &self,
        chunk: RagChunk,
        vector: Vec<f32>,
        parent: Option<String>,
        scope: Option<String>,
    ) {
        self.push(Entry {
            chunk,
            vector: Some(vector),
            parent,
            scope,
        });
    }

    /// Add a section chunk. Sections are never returned by vector queries.
    pub fn add_section(&self, chunk: RagChunk, scope: Option<String>) {
        self.push(Entry {
            chunk,
            vector: None,
            parent: None,
            scope,
        });
    }

    /// Drop every chunk and section of `doc_id` indexed under `scope`.
    /// Returns how many entries were removed.
    pub fn remove_document(&self, doc_id: &str, scope: Option<&str>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| !(e.chunk.doc_id == doc_id && e.scope.as_deref() == scope));
        before - entries.len()
    }

    /// Split markdown-ish `text` into sections (at `#` headings) and
    /// paragraphs (at blank lines), embed each paragraph, and index them.
    /// Replaces whatever was indexed for `doc_id` in `scope` before.
    /// Returns the number of searchable chunks added.
    pub async fn index_document(
        &self,
        engine: &EmbeddingEngine,
        doc_id: &str,
        scope: Option<&str>,
        text: &str,
        updated_at: Option<DateTime<Utc>>,
    ) -> usize {
        self.remove_document(doc_id, scope);
        let scope = scope.map(str::to_string);
        let mut added = 0;
        for (s, section) in split_sections(text).into_iter().enumerate() {
            let section_id = format!("{doc_id}#s{s}");
            let headings: Vec<String> = section.heading.iter().cloned().collect();
            self.add_section(
                RagChunk {
                    id: section_id.clone(),
                    doc_id: doc_id.to_string(),
                    anchor: format!("#s{s}"),
                    text: section.paragraphs.join("\n\n"),
                    score: 0.0,
                    headings: headings.clone(),
                    updated_at,
                    tokens: 0,
                },
                scope.clone(),
            );

            for (p, paragraph) in section.paragraphs.iter().enumerate() {
                let vector = engine.embed(paragraph).await;
                self.add_chunk(
                    RagChunk {
                        id: format!("{section_id}.p{p}"),
                        doc_id: doc_id.to_string(),
                        anchor: format!("#s{s}.p{p}"),
                        text: paragraph.clone(),
                        score: 0.0,
                        headings: headings.clone(),
                        updated_at,
                        tokens: 0,
                    },
                    vector,
                    Some(section_id.clone()),
                    scope.clone(),
                );
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.read().iter().filter(|e| e.vector.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, entry: Entry) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|e| e.chunk.id != entry.chunk.id);
        entries.push(entry);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IVectorStore for InMemoryChunkIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>, RetrievalError> {
        let entries = self.read();
        let mut scored: Vec<(f64, &Entry)> = entries
            .iter()
            .filter(|e| matches_filter(e, filter))
            .filter_map(|e| {
                let v = e.vector.as_ref()?;
                Some((cosine_similarity(vector, v).max(0.0), e))
            })
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, e)| VectorMatch {
                id: e.chunk.id.clone(),
                score,
                metadata: ChunkMetadata {
                    doc_id: e.chunk.doc_id.clone(),
                    anchor: e.chunk.anchor.clone(),
                    text: Some(e.chunk.text.clone()),
                    headings: e.chunk.headings.clone(),
                    updated_at: e.chunk.updated_at,
                    tokens: (e.chunk.tokens > 0).then_some(e.chunk.tokens),
                },
            })
            .collect())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[async_trait]
impl IChunkLookup for InMemoryChunkIndex {
    async fn get_chunks(&self, ids: &[String]) -> Result<Vec<RagChunk>, RetrievalError> {
        let entries = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| entries.iter().find(|e| &e.chunk.id == id))
            .map(|e| unscored(&e.chunk))
            .collect())
    }

    async fn siblings(&self, chunk_id: &str, radius: usize) -> Result<Vec<RagChunk>, RetrievalError> {
        let entries = self.read();
        let Some(target) = entries.iter().find(|e| e.chunk.id == chunk_id) else {
            return Ok(Vec::new());
        };
        let family: Vec<&Entry> = entries
            .iter()
            .filter(|e| {
                e.vector.is_some() && e.chunk.doc_id == target.chunk.doc_id && e.parent == target.parent
            })
            .collect();
        let Some(pos) = family.iter().position(|e| e.chunk.id == chunk_id) else {
            return Ok(Vec::new());
        };
        let start = pos.saturating_sub(radius);
        let end = (pos + radius + 1).min(family.len());
        Ok(family[start..end]
            .iter()
            .filter(|e| e.chunk.id != chunk_id)
            .map(|e| unscored(&e.chunk))
            .collect())
    }

    async fn parent(&self, chunk_id: &str) -> Result<Option<RagChunk>, RetrievalError> {
        let entries = self.read();
        let parent_id = entries
            .iter()
            .find(|e| e.chunk.id == chunk_id)
            .and_then(|e| e.parent.as_deref());
        Ok(parent_id
            .and_then(|pid| entries.iter().find(|e| e.chunk.id == pid))
            .map(|e| unscored(&e.chunk)))
    }
}

fn matches_filter(entry: &Entry, filter: &VectorFilter) -> bool {
    let scope_ok = match &filter.scope {
        Some(scope) => entry.scope.as_deref() == Some(scope.as_str()),
        None => true,
    };
    let doc_ok = filter.doc_ids.is_empty() || filter.doc_ids.contains(&entry.chunk.doc_id);
    scope_ok && doc_ok
}

fn unscored(chunk: &RagChunk) -> RagChunk {
    RagChunk {
        score: 0.0,
        ..chunk.clone()
    }
}

struct Section {
    heading: Option<String>,
    paragraphs: Vec<String>,
}

fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = vec![Section {
        heading: None,
        paragraphs: Vec::new(),
    }];
    let mut paragraph: Vec<&str> = Vec::new();

    fn flush(paragraph: &mut Vec<&str>, sections: &mut [Section]) {
        if !paragraph.is_empty() {
            if let Some(current) = sections.last_mut() {
                current.paragraphs.push(paragraph.join(" "));
            }
            paragraph.clear();
        }
    }

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(heading) = trimmed.strip_prefix('#') {
            flush(&mut paragraph, &mut sections);
            sections.push(Section {
                heading: Some(heading.trim_start_matches('#').trim().to_string()),
                paragraphs: Vec::new(),
            });
        } else if trimmed.is_empty() {
            flush(&mut paragraph, &mut sections);
        } else {
            paragraph.push(trimmed);
        }
    }
    flush(&mut paragraph, &mut sections);

    sections.retain(|s| !s.paragraphs.is_empty());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_headings_and_paragraphs() {
        let doc = "Intro line.\n\n# Setup\nInstall it.\nThen run it.\n\nSecond para.\n\n## Empty\n";
        let sections = split_sections(doc);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, None);
        assert_eq!(sections[1].heading.as_deref(), Some("Setup"));
        assert_eq!(sections[1].paragraphs, ["Install it. Then run it.", "Second para."]);
    }

    #[tokio::test]
    async fn reindexing_replaces_stale_paragraphs() {
        let engine = EmbeddingEngine::hashed(64);
        let index = InMemoryChunkIndex::new();
        let first = "# A\nalpha\n\nbeta\n\ngamma";
        assert_eq!(index.index_document(&engine, "d", Some("acme"), first, None).await, 3);
        index.index_document(&engine, "other", Some("acme"), "unrelated", None).await;

        assert_eq!(index.index_document(&engine, "d", Some("acme"), "# A\nalpha", None).await, 1);
        assert_eq!(index.len(), 2);

        let stale = index
            .get_chunks(&["d#s0.p1".to_string(), "d#s0.p2".to_string()])
            .await
            .unwrap();
        assert!(stale.is_empty());

        let filter = VectorFilter {
            scope: Some("acme".into()),
            ..Default::default()
        };
        let hits = index.query(&engine.embed("gamma").await, 10, &filter).await.unwrap();
        assert!(hits.iter().all(|h| h.id != "d#s0.p2"));
    }

    #[tokio::test]
    async fn siblings_stay_within_section() {
        let engine = EmbeddingEngine::hashed(64);
        let index = InMemoryChunkIndex::new();
        let doc = "# A\none\n\ntwo\n\nthree\n\n# B\nfour";
        assert_eq!(index.index_document(&engine, "d", None, doc, None).await, 4);

        let around: Vec<String> = index
            .siblings("d#s0.p1", 1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(around, ["d#s0.p0", "d#s0.p2"]);

        let edge = index.siblings("d#s1.p0", 2).await.unwrap();
        assert!(edge.is_empty());

        let parent = index.parent("d#s0.p2").await.unwrap().unwrap();
        assert_eq!(parent.id, "d#s0");
        assert_eq!(parent.headings, ["A"]);
    }

    #[tokio::test]
    async fn query_honours_scope_and_doc_filter() {
        let engine = EmbeddingEngine::hashed(128);
        let index = InMemoryChunkIndex::new();
        index
            .index_document(&engine, "rust", Some("team-a"), "Rust ownership and borrowing rules.", None)
            .await;
        index
            .index_document(&engine, "go", Some("team-b"), "Rust ownership compared with Go garbage collection.", None)
            .await;

        let q = engine.embed("rust ownership").await;
        let all = index.query(&q, 10, &VectorFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = VectorFilter {
            scope: Some("team-a".into()),
            doc_ids: vec![],
        };
        let hits = index.query(&q, 10, &scoped).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.doc_id, "rust");

        let by_doc = VectorFilter {
            scope: None,
            doc_ids: vec!["go".into()],
        };
        let hits = index.query(&q, 10, &by_doc).await.unwrap();
        assert!(hits.iter().all(|h| h.metadata.doc_id == "go"));
    }
}
