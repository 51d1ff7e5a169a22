//! Corpus accumulator consumed by the EM engine.

use super::document::Document;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Everything the EM engine needs: vocabulary, cluster ids, documents, and
/// one seed document per cluster.
///
/// All mutators are idempotent except [`add_document`](Self::add_document),
/// which overwrites. Clusters keep insertion order; documents and vocabulary
/// iterate in sorted order so that repeated fits see identical sequencing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteringModel {
    vocabulary: BTreeSet<String>,
    clusters: Vec<String>,
    documents: BTreeMap<String, Document>,
    /// Cluster id -> seed document name.
    seeds: BTreeMap<String, String>,
}

impl ClusteringModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cluster id unless it is already present.
    pub fn add_cluster(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.clusters.contains(&id) {
            self.clusters.push(id);
        }
    }

    /// Insert or overwrite the document stored under `name`.
    pub fn add_document(&mut self, name: impl Into<String>, document: Document) {
        self.documents.insert(name.into(), document);
    }

    /// Seed `cluster` with `document` unless the cluster is already seeded.
    ///
    /// The first seed wins; later calls for the same cluster are ignored.
    pub fn add_seed(&mut self, cluster: impl Into<String>, document: &Document) {
        self.seeds
            .entry(cluster.into())
            .or_insert_with(|| document.name().to_string());
    }

    /// Union `words` into the vocabulary.
    pub fn add_words<I, W>(&mut self, words: I)
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.vocabulary.extend(words.into_iter().map(Into::into));
    }

    /// Whether `cluster` already has a seed.
    pub fn has_seed(&self, cluster: &str) -> bool {
        self.seeds.contains_key(cluster)
    }

    /// Register a document that belongs to `cluster`: adds the cluster, the
    /// words, the document, and (if the cluster has none yet) the seed.
    pub fn add_labelled_document<W>(
        &mut self,
        cluster: &str,
        name: &str,
        words: impl IntoIterator<Item = W>,
    ) where
        W: Into<String>,
    {
        let document = Document::new(name, words);
        self.add_cluster(cluster);
        self.add_words(document.words());
        self.add_seed(cluster, &document);
        self.add_document(name, document);
    }

    /// Cluster ids in insertion order.
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    /// Documents in name order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.values()
    }

    /// `(key, document)` pairs in key order.
    pub fn named_documents(&self) -> impl Iterator<Item = (&str, &Document)> + '_ {
        self.documents.iter().map(|(name, doc)| (name.as_str(), doc))
    }

    /// Look up a document by name.
    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    /// Vocabulary in sorted order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocabulary.iter().map(String::as_str)
    }

    /// Seed document name of `cluster`.
    pub fn seed(&self, cluster: &str) -> Option<&str> {
        self.seeds.get(cluster).map(String::as_str)
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of documents.
    pub fn n_documents(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct vocabulary words.
    pub fn n_words(&self) -> usize {
        self.vocabulary.len()
    }

    /// Check the preconditions the EM engine relies on.
    ///
    /// Returns the first violation found: no clusters, no documents, a cluster
    /// without a seed, a seed for an unregistered cluster, a seed naming a
    /// missing document, or a document word outside the vocabulary.
    pub fn validate(&self) -> Result<()> {
        if self.clusters.is_empty() {
            return Err(Error::EmptyInput { what: "clusters" });
        }
        if self.documents.is_empty() {
            return Err(Error::EmptyInput { what: "documents" });
        }
        for cluster in &self.clusters {
            if !self.has_seed(cluster) {
                return Err(Error::MissingSeed {
                    cluster: cluster.clone(),
                });
            }
        }
        for (cluster, document) in &self.seeds {
            if !self.clusters.contains(cluster) {
                return Err(Error::UnknownCluster {
                    cluster: cluster.clone(),
                });
            }
            if !self.documents.contains_key(document) {
                return Err(Error::UnknownDocument {
                    document: document.clone(),
                });
            }
        }
        for (name, document) in &self.documents {
            // Sorted so the reported word is stable.
            let mut missing: Vec<&str> = document
                .words()
                .filter(|w| !self.vocabulary.contains(*w))
                .collect();
            missing.sort_unstable();
            if let Some(word) = missing.first() {
                return Err(Error::WordNotInVocabulary {
                    document: name.clone(),
                    word: (*word).to_string(),
                });
            }
        }
        Ok(())
    }
}
