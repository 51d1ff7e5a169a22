//! # docmix
//!
//! Soft clustering of text documents into a fixed, known set of clusters with
//! a word-presence mixture model fit by Expectation-Maximization.
//!
//! Each cluster is anchored by one seed document. EM then refines, for every
//! document, a probability distribution over clusters, and for every word a
//! likelihood of occurring in each cluster. Products of many small word
//! likelihoods are carried in extended precision so long documents do not
//! underflow to zero.
//!
//! ```rust
//! use docmix::corpus::ClusteringModel;
//! use docmix::em::MultinomialEm;
//! use docmix::report::summarize;
//!
//! let mut model = ClusteringModel::new();
//! model.add_labelled_document("space", "space/1", ["orbit", "rocket", "moon"]);
//! model.add_labelled_document("space", "space/2", ["rocket", "launch"]);
//! model.add_labelled_document("food", "food/1", ["bread", "butter"]);
//! model.add_labelled_document("food", "food/2", ["bread", "jam"]);
//!
//! let fit = MultinomialEm::new().fit(&model).unwrap();
//! let summary = summarize(&fit);
//! assert_eq!(summary.distribution[0], ("space".to_string(), 2));
//! assert_eq!(summary.distribution[1], ("food".to_string(), 2));
//! ```
//!
//! Directory corpora (`<root>/<cluster>/<file>.txt`) can be loaded with
//! `corpus::CorpusLoader` (feature `loader`, on by default).

pub mod corpus;
pub mod em;
/// Error types used across `docmix`.
pub mod error;
pub mod metrics;
pub mod report;

pub use corpus::{ClusteringModel, Document};
pub use em::{EmConfig, EmFit, MultinomialEm, Prob, SoftClustering};
pub use error::{Error, Result};
pub use report::{assign, report_lines, summarize, Assignment, ClusterSummary, ReportLine};

#[cfg(feature = "loader")]
pub use corpus::{CorpusLoader, LoadedCorpus};
