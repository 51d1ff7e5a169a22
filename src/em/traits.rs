//! Soft clustering trait.

use super::engine::EmFit;
use crate::corpus::ClusteringModel;
use crate::error::Result;
use crate::report::{assign, Assignment};

/// Algorithms that fit a [`ClusteringModel`] and return per-document
/// probability distributions over its clusters.
pub trait SoftClustering {
    /// Fit and return soft assignments.
    fn fit_proba(&self, model: &ClusteringModel) -> Result<EmFit>;

    /// Fit and reduce each document to its most probable cluster(s).
    fn fit_predict(&self, model: &ClusteringModel) -> Result<Vec<Assignment>> {
        Ok(assign(&self.fit_proba(model)?))
    }
}

impl SoftClustering for super::MultinomialEm {
    fn fit_proba(&self, model: &ClusteringModel) -> Result<EmFit> {
        self.fit(model)
    }
}
