//! Turning posteriors into labels, counts, and report lines.
//!
//! Hard labels take the argmax of each posterior row (rounded to `f64`).
//! A row whose maximum is exactly `0.0` is unclustered. Exact ties at the
//! maximum count the document toward every tied cluster, so the clusterized
//! total may exceed the number of documents.

use crate::em::EmFit;
use crate::error::Result;
use std::fmt;
use std::io::Write;

/// Posteriors must exceed this to appear in a persisted report.
pub const DEFAULT_REPORT_THRESHOLD: f64 = 0.1;

/// Hard label(s) of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Document name.
    pub document: String,
    /// Clusters sharing the maximal posterior, in cluster order. Empty when
    /// the document is unclustered.
    pub clusters: Vec<String>,
}

impl Assignment {
    /// True when every posterior of the document was zero.
    pub fn is_unclustered(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Label every document of a fit.
pub fn assign(fit: &EmFit) -> Vec<Assignment> {
    fit.documents()
        .iter()
        .enumerate()
        .map(|(d, document)| {
            let row = fit.row_f64(d);
            let max = row.iter().copied().fold(0.0, |m, p| if p > m { p } else { m });
            let clusters = if max == 0.0 {
                Vec::new()
            } else {
                row.iter()
                    .zip(fit.clusters())
                    .filter(|(p, _)| **p == max)
                    .map(|(_, c)| c.clone())
                    .collect()
            };
            Assignment {
                document: document.clone(),
                clusters,
            }
        })
        .collect()
}

/// Per-cluster document counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// `(cluster, documents labelled with it)` in cluster order.
    pub distribution: Vec<(String, usize)>,
    /// Documents with an all-zero posterior row.
    pub unclustered: usize,
    /// Sum of `distribution` counts; ties make this exceed the document count.
    pub clusterized: usize,
}

/// Count hard labels per cluster.
pub fn summarize(fit: &EmFit) -> ClusterSummary {
    let assignments = assign(fit);
    let distribution: Vec<(String, usize)> = fit
        .clusters()
        .iter()
        .map(|cluster| {
            let count = assignments
                .iter()
                .filter(|a| a.clusters.contains(cluster))
                .count();
            (cluster.clone(), count)
        })
        .collect();

    ClusterSummary {
        unclustered: assignments.iter().filter(|a| a.is_unclustered()).count(),
        clusterized: distribution.iter().map(|(_, n)| n).sum(),
        distribution,
    }
}

impl fmt::Display for ClusterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Clusters distribution:")?;
        for (cluster, count) in &self.distribution {
            writeln!(f, "  > {cluster} : {count}")?;
        }
        writeln!(f, "# Documents not clusterized: {}", self.unclustered)?;
        write!(f, "# Documents clusterized: {}", self.clusterized)
    }
}

/// One `document -> cluster : probability` entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportLine {
    /// Document name.
    pub document: String,
    /// Cluster id.
    pub cluster: String,
    /// Posterior, rounded to `f64`.
    pub probability: f64,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} : {:.6}", self.document, self.cluster, self.probability)
    }
}

/// Every (document, cluster) pair whose posterior is strictly above `threshold`.
pub fn report_lines(fit: &EmFit, threshold: f64) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    for (d, document) in fit.documents().iter().enumerate() {
        for (probability, cluster) in fit.row_f64(d).into_iter().zip(fit.clusters()) {
            if probability > threshold {
                lines.push(ReportLine {
                    document: document.clone(),
                    cluster: cluster.clone(),
                    probability,
                });
            }
        }
    }
    lines
}

/// Write one line per entry.
pub fn write_report<W: Write>(mut writer: W, lines: &[ReportLine]) -> Result<()> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}
