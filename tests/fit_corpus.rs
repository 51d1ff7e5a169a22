//! End-to-end: directory corpus -> EM fit -> report.

use docmix::corpus::{ClusteringModel, CorpusLoader, Document};
use docmix::em::{to_f64, MultinomialEm, SoftClustering};
use docmix::metrics::agreement;
use docmix::report::{report_lines, summarize, write_report, DEFAULT_REPORT_THRESHOLD};
use docmix::Error;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn sample_corpus(root: &Path) {
    write(root, "astronomy/01.txt", "The telescope observed a distant galaxy and its stars.");
    write(root, "astronomy/02.txt", "Stars in the galaxy orbit a black hole; the telescope saw it.");
    write(root, "astronomy/03.txt", "A comet passed the stars; astronomers used a telescope.");
    write(root, "cooking/01.txt", "Knead the dough, add butter and flour, then bake the bread.");
    write(root, "cooking/02.txt", "Bake the bread with flour and butter until golden.");
    write(root, "cooking/03.txt", "Whisk butter and sugar, fold in flour, bake the cake.");
}

#[test]
fn directory_corpus_is_recovered() {
    let dir = TempDir::new().unwrap();
    sample_corpus(dir.path());

    let corpus = CorpusLoader::new(dir.path()).load().unwrap();
    assert_eq!(corpus.model.seed("astronomy"), Some("astronomy/01.txt"));
    assert_eq!(corpus.model.seed("cooking"), Some("cooking/01.txt"));

    let fit = MultinomialEm::new().fit(&corpus.model).unwrap();
    assert!(fit.iterations() < 100);
    assert!(fit.converged());

    let summary = summarize(&fit);
    assert_eq!(
        summary.distribution,
        vec![("astronomy".to_string(), 3), ("cooking".to_string(), 3)]
    );
    assert_eq!(summary.unclustered, 0);

    let assignments = MultinomialEm::new().fit_predict(&corpus.model).unwrap();
    let score = agreement(&assignments, &corpus.labels);
    assert_eq!(score.evaluated, 6);
    assert_eq!(score.purity, 1.0);

    let out = dir.path().join("output.txt");
    let lines = report_lines(&fit, DEFAULT_REPORT_THRESHOLD);
    write_report(fs::File::create(&out).unwrap(), &lines).unwrap();
    let text = fs::read_to_string(out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.contains("cooking/02.txt -> cooking : 1.000000"));
}

#[test]
fn long_documents_do_not_underflow() {
    // 600 distinct words per document: each likelihood product is far below
    // the smallest positive f64, yet posteriors stay well defined.
    let vocab_a: Vec<String> = (0..600).map(|i| format!("alpha{i}")).collect();
    let vocab_b: Vec<String> = (0..600).map(|i| format!("beta{i}")).collect();

    let mut model = ClusteringModel::new();
    model.add_labelled_document("a", "a/seed", vocab_a.iter().cloned());
    model.add_labelled_document("b", "b/seed", vocab_b.iter().cloned());
    model.add_labelled_document("a", "a/other", vocab_a[..400].iter().cloned());
    model.add_labelled_document("b", "b/other", vocab_b[200..].iter().cloned());

    let fit = MultinomialEm::new().fit(&model).unwrap();
    assert!(fit.posterior_f64("a/other", "a").unwrap() > 0.999);
    assert!(fit.posterior_f64("b/other", "b").unwrap() > 0.999);
    for d in 0..fit.documents().len() {
        let sum: f64 = fit.row_f64(d).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}

#[test]
fn seed_matrix_before_first_pass() {
    let mut model = ClusteringModel::new();
    model.add_labelled_document("x", "x/1", ["p", "q"]);
    model.add_labelled_document("y", "y/1", ["r"]);
    model.add_labelled_document("y", "y/2", ["r", "s"]);

    let fit = MultinomialEm::new().with_max_iterations(1).fit(&model).unwrap();
    let value = |d: &str, c: &str| to_f64(fit.posterior(d, c).unwrap());
    assert_eq!(value("x/1", "x"), 1.0);
    assert_eq!(value("x/1", "y"), 0.0);
    assert_eq!(value("y/1", "y"), 1.0);
    assert_eq!(value("y/1", "x"), 0.0);
    assert_eq!(value("y/2", "x"), 0.0);
    assert_eq!(value("y/2", "y"), 0.0);
}

#[test]
fn manual_model_without_vocabulary_is_rejected() {
    let mut model = ClusteringModel::new();
    let doc = Document::new("d", ["unregistered"]);
    model.add_cluster("c");
    model.add_seed("c", &doc);
    model.add_document("d", doc);

    let err = MultinomialEm::new().fit(&model).unwrap_err();
    assert_eq!(
        err,
        Error::WordNotInVocabulary {
            document: "d".into(),
            word: "unregistered".into()
        }
    );
}

fn arbitrary_model() -> impl Strategy<Value = ClusteringModel> {
    let doc = proptest::collection::btree_set("[a-h]", 0..6);
    let docs = proptest::collection::vec((0usize..3, doc), 1..10);
    docs.prop_map(|docs| {
        let mut model = ClusteringModel::new();
        for (i, (cluster, words)) in docs.into_iter().enumerate() {
            model.add_labelled_document(&format!("c{cluster}"), &format!("d{i:02}"), words);
        }
        model
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn fits_are_normalized_bounded_and_reproducible(model in arbitrary_model()) {
        let engine = MultinomialEm::new().with_max_iterations(20);
        let fit = engine.fit(&model).unwrap();
        prop_assert!(fit.iterations() <= 20);
        for d in 0..fit.documents().len() {
            let sum: f64 = fit.row_f64(d).iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", d, sum);
        }
        prop_assert_eq!(engine.fit(&model).unwrap(), fit);
    }
}
