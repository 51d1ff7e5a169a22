//! Seeded multinomial mixture fit by EM.

use super::config::EmConfig;
use super::precision::{positive_log_sum, to_f64, Precision, Prob};
use crate::corpus::ClusteringModel;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// EM engine for the binary word-presence mixture.
///
/// ```rust
/// use docmix::corpus::ClusteringModel;
/// use docmix::em::MultinomialEm;
///
/// let mut model = ClusteringModel::new();
/// model.add_labelled_document("pets", "pets/a", ["cat", "dog"]);
/// model.add_labelled_document("pets", "pets/b", ["cat", "fur"]);
/// model.add_labelled_document("cars", "cars/a", ["wheel", "engine"]);
///
/// let fit = MultinomialEm::new().fit(&model).unwrap();
/// let p = fit.posterior_f64("pets/b", "pets").unwrap();
/// assert!(p > 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultinomialEm {
    config: EmConfig,
}

/// Read-only view of the engine after one completed iteration.
#[derive(Debug)]
pub struct IterationState<'a> {
    /// 1-based iteration index.
    pub iteration: usize,
    /// Cluster ids, indexing the cluster axis of every matrix.
    pub clusters: &'a [String],
    /// Document names, indexing rows of `posteriors`.
    pub documents: &'a [String],
    /// Vocabulary, indexing rows of `word_likelihoods`.
    pub words: &'a [String],
    /// Normalized cluster priors.
    pub priors: &'a Array1<Prob>,
    /// `P(word | cluster)`, words x clusters.
    pub word_likelihoods: &'a Array2<Prob>,
    /// `P(cluster | document)`, documents x clusters.
    pub posteriors: &'a Array2<Prob>,
    /// Sum of `ln` over strictly positive posteriors.
    pub statistic: f64,
}

/// Result of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct EmFit {
    clusters: Vec<String>,
    documents: Vec<String>,
    posteriors: Array2<Prob>,
    iterations: usize,
    converged: bool,
    statistic: f64,
}

impl EmFit {
    /// Cluster ids in model order (column order of the posterior matrix).
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    /// Document names in sorted order (row order of the posterior matrix).
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Posterior matrix, documents x clusters.
    pub fn posteriors(&self) -> &Array2<Prob> {
        &self.posteriors
    }

    /// Iteration index the loop stopped at (1-based).
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the stopping delta was reached before the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Final convergence statistic.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// `P(cluster | document)` at full precision.
    pub fn posterior(&self, document: &str, cluster: &str) -> Option<&Prob> {
        let d = self.document_index(document)?;
        let c = self.cluster_index(cluster)?;
        Some(&self.posteriors[[d, c]])
    }

    /// `P(cluster | document)` rounded to `f64`.
    pub fn posterior_f64(&self, document: &str, cluster: &str) -> Option<f64> {
        self.posterior(document, cluster).map(to_f64)
    }

    /// Posterior row of the `index`-th document, rounded to `f64`.
    pub fn row_f64(&self, index: usize) -> Vec<f64> {
        self.posteriors.row(index).iter().map(to_f64).collect()
    }

    /// Row index of a document.
    pub fn document_index(&self, document: &str) -> Option<usize> {
        self.documents
            .binary_search_by(|name| name.as_str().cmp(document))
            .ok()
    }

    /// Column index of a cluster.
    pub fn cluster_index(&self, cluster: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c == cluster)
    }
}

/// Model flattened to integer indices.
struct IndexedCorpus {
    clusters: Vec<String>,
    documents: Vec<String>,
    words: Vec<String>,
    /// Word indices of each document, ascending.
    doc_words: Vec<Vec<usize>>,
    /// Document indices containing each word, ascending.
    postings: Vec<Vec<usize>>,
    /// Seed document index of each cluster.
    seeds: Vec<usize>,
}

impl IndexedCorpus {
    fn build(model: &ClusteringModel) -> Result<Self> {
        let clusters = model.clusters().to_vec();
        let words: Vec<String> = model.vocabulary().map(str::to_string).collect();
        let word_index: HashMap<&str, usize> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i))
            .collect();

        let mut documents = Vec::with_capacity(model.n_documents());
        let mut doc_words = Vec::with_capacity(model.n_documents());
        let mut postings = vec![Vec::new(); words.len()];

        for (d, (name, document)) in model.named_documents().enumerate() {
            let mut indices = document
                .words()
                .map(|w| {
                    word_index
                        .get(w)
                        .copied()
                        .ok_or_else(|| Error::WordNotInVocabulary {
                            document: name.to_string(),
                            word: w.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            indices.sort_unstable();
            for &w in &indices {
                postings[w].push(d);
            }
            documents.push(name.to_string());
            doc_words.push(indices);
        }

        let seeds = clusters
            .iter()
            .map(|cluster| {
                let name = model.seed(cluster).ok_or_else(|| Error::MissingSeed {
                    cluster: cluster.clone(),
                })?;
                documents
                    .binary_search_by(|d| d.as_str().cmp(name))
                    .map_err(|_| Error::UnknownDocument {
                        document: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clusters,
            documents,
            words,
            doc_words,
            postings,
            seeds,
        })
    }
}

impl MultinomialEm {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EmConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: EmConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the additive smoothing term.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set the stopping delta.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.config.convergence_threshold = threshold;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the mantissa width in bits.
    pub fn with_precision_bits(mut self, bits: usize) -> Self {
        self.config.precision_bits = bits;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EmConfig {
        &self.config
    }

    /// Fit the mixture and return per-document posteriors.
    pub fn fit(&self, model: &ClusteringModel) -> Result<EmFit> {
        self.fit_observed(model, |_| {})
    }

    /// Like [`fit`](Self::fit), calling `observer` after every iteration.
    pub fn fit_observed<F>(&self, model: &ClusteringModel, mut observer: F) -> Result<EmFit>
    where
        F: FnMut(&IterationState<'_>),
    {
        self.config.validate()?;
        model.validate()?;

        let corpus = IndexedCorpus::build(model)?;
        let ctx = Precision::new(self.config.precision_bits);
        let epsilon = ctx.from_f64("epsilon", self.config.epsilon)?;

        let n_docs = corpus.documents.len();
        let k = corpus.clusters.len();

        // Hard seed assignment: only seeds carry mass. The uniform prior and
        // zero likelihoods of the textbook initialization are never read
        // before the first M-step overwrites them, so they are not materialized.
        let mut posteriors = Array2::from_elem((n_docs, k), ctx.zero());
        for (c, &seed) in corpus.seeds.iter().enumerate() {
            posteriors[[seed, c]] = ctx.one();
        }

        let mut current = positive_log_sum(posteriors.iter());
        let mut iteration = 1;
        let mut converged = false;

        while iteration < self.config.max_iterations {
            let previous = current;

            let mass = cluster_masses(&posteriors, &corpus.clusters, &ctx, iteration)?;
            let likelihoods = maximize(&corpus, &posteriors, &mass, &epsilon);
            let priors = normalize_priors(&mass, &ctx);
            posteriors = expect(&corpus, &priors, &likelihoods, iteration)?;

            current = positive_log_sum(posteriors.iter());
            let delta = (current - previous).abs();
            debug!(iteration, statistic = current, delta, "em iteration");

            observer(&IterationState {
                iteration,
                clusters: &corpus.clusters,
                documents: &corpus.documents,
                words: &corpus.words,
                priors: &priors,
                word_likelihoods: &likelihoods,
                posteriors: &posteriors,
                statistic: current,
            });

            if delta < self.config.convergence_threshold {
                converged = true;
                break;
            }
            iteration += 1;
        }

        info!(
            iterations = iteration,
            converged,
            statistic = current,
            documents = n_docs,
            clusters = k,
            words = corpus.words.len(),
            "em fit finished"
        );

        Ok(EmFit {
            clusters: corpus.clusters,
            documents: corpus.documents,
            posteriors,
            iterations: iteration,
            converged,
            statistic: current,
        })
    }
}

/// `Σ_d P(c | d)` per cluster; zero mass cannot be divided by.
fn cluster_masses(
    posteriors: &Array2<Prob>,
    clusters: &[String],
    ctx: &Precision,
    iteration: usize,
) -> Result<Vec<Prob>> {
    clusters
        .iter()
        .enumerate()
        .map(|(c, cluster)| {
            let mass = posteriors
                .column(c)
                .iter()
                .fold(ctx.zero(), |acc, p| &acc + p);
            if mass == Prob::ZERO {
                return Err(Error::DegenerateDistribution {
                    quantity: "cluster mass",
                    key: cluster.clone(),
                    iteration,
                });
            }
            Ok(mass)
        })
        .collect()
}

/// M-step: `P(w | c) = (epsilon + Σ_{d ∋ w} P(c | d)) / Σ_d P(c | d)`.
fn maximize(
    corpus: &IndexedCorpus,
    posteriors: &Array2<Prob>,
    mass: &[Prob],
    epsilon: &Prob,
) -> Array2<Prob> {
    let word_row = |w: usize| -> Vec<Prob> {
        mass.iter()
            .enumerate()
            .map(|(c, denominator)| {
                let numerator = corpus.postings[w]
                    .iter()
                    .fold(epsilon.clone(), |acc, &d| &acc + &posteriors[[d, c]]);
                &numerator / denominator
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<Prob>> = (0..corpus.words.len()).into_par_iter().map(word_row).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<Prob>> = (0..corpus.words.len()).map(word_row).collect();

    stack_rows(rows, mass.len())
}

/// Cluster prior proportional to cluster mass.
fn normalize_priors(mass: &[Prob], ctx: &Precision) -> Array1<Prob> {
    let total = mass.iter().fold(ctx.zero(), |acc, m| &acc + m);
    mass.iter().map(|m| m / &total).collect()
}

/// E-step: `P(c | d) ∝ P(c) · Π_{w ∈ d} P(w | c)`, normalized per document.
fn expect(
    corpus: &IndexedCorpus,
    priors: &Array1<Prob>,
    likelihoods: &Array2<Prob>,
    iteration: usize,
) -> Result<Array2<Prob>> {
    let doc_row = |d: usize| -> Result<Vec<Prob>> {
        let raw: Vec<Prob> = priors
            .iter()
            .enumerate()
            .map(|(c, prior)| {
                corpus.doc_words[d]
                    .iter()
                    .map(|&w| &likelihoods[[w, c]])
                    .filter(|l| **l > Prob::ZERO)
                    .fold(prior.clone(), |acc, l| &acc * l)
            })
            .collect();
        normalize_row(raw, &corpus.documents[d], iteration)
    };

    #[cfg(feature = "parallel")]
    let rows = (0..corpus.documents.len())
        .into_par_iter()
        .map(doc_row)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let rows = (0..corpus.documents.len())
        .map(doc_row)
        .collect::<Result<Vec<_>>>()?;

    Ok(stack_rows(rows, priors.len()))
}

/// Divide a document's raw scores by their sum.
fn normalize_row(raw: Vec<Prob>, document: &str, iteration: usize) -> Result<Vec<Prob>> {
    let mut iter = raw.iter();
    let first = match iter.next() {
        Some(first) => first.clone(),
        None => return Ok(raw),
    };
    let evidence = iter.fold(first, |acc, r| &acc + r);
    if evidence == Prob::ZERO {
        return Err(Error::DegenerateDistribution {
            quantity: "document evidence",
            key: document.to_string(),
            iteration,
        });
    }
    Ok(raw.iter().map(|r| r / &evidence).collect())
}

fn stack_rows(rows: Vec<Vec<Prob>>, width: usize) -> Array2<Prob> {
    Array2::from_shape_fn((rows.len(), width), |(r, c)| rows[r][c].clone())
}
