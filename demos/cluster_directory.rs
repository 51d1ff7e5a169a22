use docmix::corpus::CorpusLoader;
use docmix::em::MultinomialEm;
use docmix::metrics::agreement;
use docmix::report::{assign, report_lines, summarize, write_report, DEFAULT_REPORT_THRESHOLD};
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Cluster every `<data>/<cluster>/*.txt` file, print a summary, and write
    // `document -> cluster : p` lines for posteriors above 0.1.
    //
    // Run with: cargo run --example cluster_directory -- [data-dir] [output-file]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| "data".to_string());
    let output = args.next().unwrap_or_else(|| "output.txt".to_string());

    let corpus = CorpusLoader::new(&data_dir).load()?;
    let model = &corpus.model;

    let started = Instant::now();
    let fit = MultinomialEm::new().fit(model)?;
    let elapsed = started.elapsed();

    println!("# Fit time: {:.3}s", elapsed.as_secs_f64());
    println!("# Initial parameters:");
    for cluster in model.clusters() {
        println!("  > {} : {}", cluster, model.seed(cluster).unwrap_or("-"));
    }
    println!("# Iterations: {}", fit.iterations());
    println!("{}", summarize(&fit));

    let score = agreement(&assign(&fit), &corpus.labels);
    println!(
        "# Agreement with directories: purity {:.4}, nmi {:.4} over {} documents",
        score.purity, score.nmi, score.evaluated
    );

    let lines = report_lines(&fit, DEFAULT_REPORT_THRESHOLD);
    write_report(BufWriter::new(File::create(&output)?), &lines)?;
    println!("# Data saved to {output}");

    Ok(())
}
