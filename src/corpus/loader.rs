//! Build a [`ClusteringModel`] from a directory tree.
//!
//! Expected layout is `<root>/<cluster>/.../<file>.<ext>`: the first path
//! component under the root names the cluster, and the lexically first file
//! of each cluster becomes its seed.

use super::model::ClusteringModel;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Split text into maximal runs of ASCII letters.
///
/// ```rust
/// use docmix::corpus::tokenize;
///
/// let words: Vec<&str> = tokenize("It's 2 o'clock, Rust-lang!").collect();
/// assert_eq!(words, ["It", "s", "o", "clock", "Rust", "lang"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
}

/// A loaded corpus plus the directory label of every document.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    /// Model ready for fitting.
    pub model: ClusteringModel,
    /// Document name -> cluster directory it was read from.
    pub labels: BTreeMap<String, String>,
}

/// Directory corpus loader.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    root: PathBuf,
    extension: String,
}

impl CorpusLoader {
    /// Loader for `root`, accepting `.txt` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "txt".to_string(),
        }
    }

    /// Accept files with this extension instead (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Walk the root and build the model.
    ///
    /// Files that cannot be read are logged and skipped; a cluster whose files
    /// were all skipped is never registered.
    pub fn load(&self) -> Result<LoadedCorpus> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files)?;
        files.sort();

        let mut model = ClusteringModel::new();
        let mut labels = BTreeMap::new();

        for path in files {
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let name = self.relative_name(&path);
            let cluster = match name.split_once('/') {
                Some((cluster, _)) => cluster.to_string(),
                None => return Err(Error::InvalidLayout { path: name }),
            };

            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&bytes);

            model.add_labelled_document(&cluster, &name, tokenize(&text));
            labels.insert(name, cluster);
        }

        tracing::info!(
            root = %self.root.display(),
            clusters = model.n_clusters(),
            documents = model.n_documents(),
            words = model.n_words(),
            "corpus loaded"
        );

        Ok(LoadedCorpus { model, labels })
    }

    /// Path relative to the root, `/`-separated.
    fn relative_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn tokenize_keeps_letter_runs_only() {
        let tokens: Vec<_> = tokenize("a1b  c\td-e__f").collect();
        assert_eq!(tokens, ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(tokenize("123 !?").count(), 0);
    }

    #[test]
    fn load_builds_seeded_model() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sport/b.txt", "goal goal referee");
        write(dir.path(), "sport/a.txt", "ball goal");
        write(dir.path(), "tech/x.txt", "compiler borrow checker");
        write(dir.path(), "tech/notes.md", "ignored entirely");

        let corpus = CorpusLoader::new(dir.path()).load().unwrap();
        let model = &corpus.model;

        assert_eq!(model.clusters(), &["sport".to_string(), "tech".to_string()]);
        assert_eq!(model.n_documents(), 3);
        assert_eq!(model.seed("sport"), Some("sport/a.txt"));
        assert_eq!(model.seed("tech"), Some("tech/x.txt"));
        assert!(model.document("sport/b.txt").unwrap().contains("referee"));
        assert_eq!(corpus.labels["tech/x.txt"], "tech");
        assert!(model.validate().is_ok());
    }

    #[test]
    fn nested_files_take_top_level_cluster() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "news/2020/jan.txt", "election");
        let corpus = CorpusLoader::new(dir.path()).load().unwrap();
        assert_eq!(corpus.labels["news/2020/jan.txt"], "news");
    }

    #[test]
    fn file_at_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "loose.txt", "words");
        let err = CorpusLoader::new(dir.path()).load().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidLayout {
                path: "loose.txt".into()
            }
        );
    }

    #[test]
    fn custom_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "c/a.md", "markdown words");
        write(dir.path(), "c/b.txt", "text words");
        let corpus = CorpusLoader::new(dir.path())
            .with_extension(".md")
            .load()
            .unwrap();
        assert_eq!(corpus.model.n_documents(), 1);
        assert!(corpus.model.document("c/a.md").is_some());
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CorpusLoader::new(dir.path().join("absent")).load().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
