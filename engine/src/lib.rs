pub mod dataset;
pub mod error;
pub mod index;
pub mod persist;
pub mod tokenizer;

pub use dataset::load_documents;
pub use error::{IndexError, Result};
pub use index::{build_inverted_index, InvertedIndex};
pub use persist::{BinaryPolicy, BincodePolicy, StoragePolicy};

/// Document identifier as stored in postings: 32-bit signed, matching the
/// fixed-width integers of the on-disk layout.
pub type DocId = i32;
