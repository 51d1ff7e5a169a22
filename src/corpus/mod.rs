//! Corpus representation: documents, the clustering model, and loading.
//!
//! Documents are word-presence sets. The [`ClusteringModel`] accumulates them
//! together with the global vocabulary, the cluster ids, and one seed document
//! per cluster. Every accumulation method is idempotent (except document
//! insertion, which overwrites), so a loader can call them blindly per file.
//!
//! ```rust
//! use docmix::corpus::{ClusteringModel, Document};
//!
//! let mut model = ClusteringModel::new();
//! let doc = Document::new("sport/1.txt", ["ball", "goal"]);
//! model.add_cluster("sport");
//! model.add_words(doc.words());
//! model.add_seed("sport", &doc);
//! model.add_document("sport/1.txt", doc);
//! assert!(model.validate().is_ok());
//! ```

mod document;
#[cfg(feature = "loader")]
mod loader;
mod model;

pub use document::Document;
#[cfg(feature = "loader")]
pub use loader::{tokenize, CorpusLoader, LoadedCorpus};
pub use model::ClusteringModel;
