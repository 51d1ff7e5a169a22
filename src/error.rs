use core::fmt;

/// Result alias for `docmix`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by corpus construction, the EM engine, and reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A required collection was empty.
    EmptyInput {
        /// What was empty ("clusters", "documents").
        what: &'static str,
    },

    /// A cluster has no seed document.
    MissingSeed {
        /// Cluster identifier.
        cluster: String,
    },

    /// A seed was registered for a cluster that was never added.
    UnknownCluster {
        /// Cluster identifier.
        cluster: String,
    },

    /// A seed names a document that is not in the corpus.
    UnknownDocument {
        /// Document name.
        document: String,
    },

    /// A document uses a word that was never added to the vocabulary.
    WordNotInVocabulary {
        /// Document name.
        document: String,
        /// Offending word.
        word: String,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A distribution had zero total mass and could not be normalized.
    DegenerateDistribution {
        /// Which quantity failed ("cluster mass", "document evidence", "cluster prior").
        quantity: &'static str,
        /// Document or cluster the quantity belongs to.
        key: String,
        /// EM iteration (1-based) at which it happened.
        iteration: usize,
    },

    /// Corpus layout did not match `<root>/<cluster>/<file>`.
    InvalidLayout {
        /// Offending path, relative to the corpus root.
        path: String,
    },

    /// I/O failure while loading a corpus or writing a report.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput { what } => write!(f, "no {what} defined"),
            Error::MissingSeed { cluster } => {
                write!(f, "cluster '{cluster}' has no seed document")
            }
            Error::UnknownCluster { cluster } => {
                write!(f, "seed registered for unknown cluster '{cluster}'")
            }
            Error::UnknownDocument { document } => {
                write!(f, "seed document '{document}' is not in the corpus")
            }
            Error::WordNotInVocabulary { document, word } => {
                write!(f, "document '{document}' uses word '{word}' missing from the vocabulary")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::DegenerateDistribution {
                quantity,
                key,
                iteration,
            } => write!(
                f,
                "{quantity} for '{key}' is zero at iteration {iteration}; cannot normalize"
            ),
            Error::InvalidLayout { path } => {
                write!(f, "'{path}' is not inside a cluster directory")
            }
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
