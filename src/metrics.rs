//! Agreement between hard labels and known cluster membership.
//!
//! When documents come from `<root>/<cluster>/` directories the directory is
//! a ground-truth label, and these scores tell how well the fitted mixture
//! recovered it.
//!
//! | Metric | Range | Best |
//! |--------|-------|------|
//! | [`purity`] | [0, 1] | 1 |
//! | [`nmi`] | [0, 1] | 1 |
//!
//! ```rust
//! use docmix::metrics::{nmi, purity};
//!
//! let pred = ["a", "a", "b", "b"];
//! let truth = [0, 0, 1, 1];
//! assert_eq!(purity(&pred, &truth), 1.0);
//! assert!((nmi(&pred, &truth) - 1.0).abs() < 1e-12);
//! ```

use crate::report::Assignment;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Fraction of items whose predicted group's majority truth label matches.
///
/// Returns 0 for empty or mismatched inputs.
pub fn purity<P, T>(pred: &[P], truth: &[T]) -> f64
where
    P: Eq + Hash,
    T: Eq + Hash,
{
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let joint = contingency(pred, truth);

    let mut best: HashMap<&P, usize> = HashMap::new();
    for (&(p, _), &count) in &joint {
        let slot = best.entry(p).or_insert(0);
        *slot = (*slot).max(count);
    }
    best.values().sum::<usize>() as f64 / pred.len() as f64
}

/// Normalized mutual information, `2 I(P; T) / (H(P) + H(T))`.
///
/// Two constant labelings score 1. Returns 0 for empty or mismatched inputs.
pub fn nmi<P, T>(pred: &[P], truth: &[T]) -> f64
where
    P: Eq + Hash,
    T: Eq + Hash,
{
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let n = pred.len() as f64;
    let joint = contingency(pred, truth);
    let pred_counts = counts(pred);
    let truth_counts = counts(truth);

    let mut mi = 0.0;
    for (&(p, t), &count) in &joint {
        let p_joint = count as f64 / n;
        let p_pred = pred_counts[p] as f64 / n;
        let p_truth = truth_counts[t] as f64 / n;
        mi += p_joint * (p_joint / (p_pred * p_truth)).ln();
    }

    let denom = entropy(&pred_counts, n) + entropy(&truth_counts, n);
    if denom > 0.0 {
        2.0 * mi / denom
    } else {
        1.0
    }
}

/// Purity and NMI of a fit's hard labels against directory labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agreement {
    /// Documents present in both inputs.
    pub evaluated: usize,
    /// See [`purity`].
    pub purity: f64,
    /// See [`nmi`].
    pub nmi: f64,
}

/// Score `assignments` against `truth` (document name -> true cluster).
///
/// Tied documents use their first tied cluster; unclustered documents form
/// a group of their own. Documents missing from `truth` are ignored.
pub fn agreement(assignments: &[Assignment], truth: &BTreeMap<String, String>) -> Agreement {
    let (pred, actual): (Vec<Option<&str>>, Vec<&str>) = assignments
        .iter()
        .filter_map(|a| {
            let label = truth.get(&a.document)?;
            Some((a.clusters.first().map(String::as_str), label.as_str()))
        })
        .unzip();

    Agreement {
        evaluated: pred.len(),
        purity: purity(&pred, &actual),
        nmi: nmi(&pred, &actual),
    }
}

fn contingency<'a, P, T>(pred: &'a [P], truth: &'a [T]) -> HashMap<(&'a P, &'a T), usize>
where
    P: Eq + Hash,
    T: Eq + Hash,
{
    let mut joint = HashMap::new();
    for pair in pred.iter().zip(truth) {
        *joint.entry(pair).or_insert(0) += 1;
    }
    joint
}

fn counts<L: Eq + Hash>(labels: &[L]) -> HashMap<&L, usize> {
    let mut out = HashMap::new();
    for label in labels {
        *out.entry(label).or_insert(0) += 1;
    }
    out
}

fn entropy<L>(counts: &HashMap<&L, usize>, n: f64) -> f64 {
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}
