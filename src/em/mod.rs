//! Expectation-Maximization for a seeded word-presence mixture.
//!
//! Each document is a set of words. Cluster `c` has a prior `π_c` and, for
//! every vocabulary word `w`, a likelihood `θ_wc` of containing it. The
//! engine alternates:
//!
//! **M-step** (with additive smoothing `ε` on the numerator only):
//! ```text
//! θ_wc = (ε + Σ_{d ∋ w} γ_dc) / Σ_d γ_dc
//! π_c  = Σ_d γ_dc / Σ_c' Σ_d γ_dc'
//! ```
//!
//! **E-step** (responsibilities):
//! ```text
//! γ_dc = π_c · Π_{w ∈ d, θ_wc > 0} θ_wc  /  Σ_c' (same for c')
//! ```
//!
//! # Initialization
//!
//! Every cluster is anchored by one seed document with `γ = 1` for its own
//! cluster; all other documents start with zero mass everywhere. The first
//! M-step therefore estimates each cluster from its seed alone.
//!
//! # Stopping
//!
//! After each E-step the statistic `Σ_{d,c: γ_dc > 0} ln γ_dc` is compared to
//! the previous one (starting at 0 for the seed matrix). The loop stops when
//! the absolute change is below the threshold, or when the iteration index
//! reaches the cap. This is not the data log-likelihood of the mixture; it
//! is kept because it decides when fits stop.
//!
//! # Precision
//!
//! `Π θ_wc` over a few hundred words underflows `f64`, so all probabilities
//! are [`Prob`] values with a configurable mantissa (400 bits by default).
//!
//! ```rust
//! use docmix::corpus::ClusteringModel;
//! use docmix::em::{EmConfig, MultinomialEm};
//!
//! let mut model = ClusteringModel::new();
//! model.add_labelled_document("a", "a/1", ["x", "y"]);
//! model.add_labelled_document("b", "b/1", ["z"]);
//!
//! let config = EmConfig::default().with_max_iterations(10);
//! let fit = MultinomialEm::new().with_config(config).fit(&model).unwrap();
//! assert!(fit.iterations() <= 10);
//! ```

mod config;
mod engine;
mod precision;
mod traits;

pub use config::EmConfig;
pub use engine::{EmFit, IterationState, MultinomialEm};
pub use precision::{positive_log_sum, to_f64, Precision, Prob};
pub use traits::SoftClustering;
