//! Dataset loading: one document per line, an id token followed by free text.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{IndexError, Result};

lazy_static! {
    static ref EDGE: Regex = Regex::new(r"^\W+|\W+$").expect("valid regex");
    static ref SEP: Regex = Regex::new(r"\W+").expect("valid regex");
}

/// Load a dataset file into a document id -> content mapping.
///
/// Each non-empty line is trimmed of leading/trailing non-word runs and split
/// once on the first non-word run into (id, content); the content keeps its
/// inner whitespace verbatim. Lines empty after trimming are skipped. A line
/// with an id but no content aborts the load — there is no per-line recovery.
/// Duplicate ids overwrite (last write wins).
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut docs = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let raw = line?;
        let stripped = EDGE.replace_all(&raw, "");
        let trimmed: &str = &stripped;
        if trimmed.is_empty() {
            continue;
        }
        match SEP.find(trimmed) {
            Some(gap) => {
                let doc_id = trimmed[..gap.start()].to_string();
                let content = trimmed[gap.end()..].to_string();
                docs.insert(doc_id, content);
            }
            None => {
                return Err(IndexError::MalformedDocument(format!(
                    "line {}: no content after document id {trimmed:?}",
                    lineno + 1
                )));
            }
        }
    }

    tracing::debug!(num_docs = docs.len(), "loaded dataset");
    Ok(docs)
}
