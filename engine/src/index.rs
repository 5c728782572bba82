use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::persist::{BinaryPolicy, StoragePolicy};
use crate::tokenizer::tokenize;
use crate::DocId;

/// Mapping from normalized term to the set of documents containing it.
pub type PostingsMap = HashMap<String, HashSet<DocId>>;

/// In-memory inverted index over a line-delimited document corpus.
///
/// Equality is structural: identical term sets and, per term, identical
/// postings sets. Iteration order never participates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvertedIndex {
    data: PostingsMap,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms in the index.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Conjunctive lookup: ids of documents containing every given term.
    ///
    /// Incoming terms are normalized with the same tokenizer used at build
    /// time, and duplicates collapse (a no-op for intersection). An empty
    /// terms sequence yields an empty result; a term absent from the index
    /// has an empty postings set, so the whole intersection is empty rather
    /// than an error. Output order is unspecified.
    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> Vec<DocId> {
        let mut normalized: Vec<String> = terms
            .iter()
            .flat_map(|t| tokenize(t.as_ref()))
            .collect();
        normalized.sort_unstable();
        normalized.dedup();

        let mut acc: Option<HashSet<DocId>> = None;
        for term in &normalized {
            let postings = match self.data.get(term) {
                Some(postings) => postings,
                None => return Vec::new(),
            };
            acc = Some(match acc {
                None => postings.clone(),
                Some(prev) => prev.intersection(postings).copied().collect(),
            });
        }
        match acc {
            Some(hits) => hits.into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Serialize with the default storage policy.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.dump_with(&BinaryPolicy, path)
    }

    /// Serialize with an explicit storage policy.
    pub fn dump_with<P: AsRef<Path>>(&self, policy: &dyn StoragePolicy, path: P) -> Result<()> {
        policy.dump(&self.data, path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), num_terms = self.data.len(), "dumped index");
        Ok(())
    }

    /// Deserialize with the default storage policy.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(&BinaryPolicy, path)
    }

    /// Deserialize with an explicit storage policy.
    pub fn load_with<P: AsRef<Path>>(policy: &dyn StoragePolicy, path: P) -> Result<Self> {
        let data = policy.load(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), num_terms = data.len(), "loaded index");
        Ok(Self { data })
    }
}

/// Build an index from loaded documents: each document contributes its
/// distinct term set, and its id — parsed as a 32-bit integer — joins the
/// postings set of every such term.
pub fn build_inverted_index(docs: &HashMap<String, String>) -> Result<InvertedIndex> {
    let mut data = PostingsMap::new();
    for (doc_id, content) in docs {
        let id: DocId = doc_id.parse().map_err(|_| {
            IndexError::MalformedDocument(format!("document id {doc_id:?} is not an integer"))
        })?;
        let terms: HashSet<String> = tokenize(content).into_iter().collect();
        for term in terms {
            data.entry(term).or_default().insert(id);
        }
    }
    tracing::info!(num_docs = docs.len(), num_terms = data.len(), "built inverted index");
    Ok(InvertedIndex { data })
}
