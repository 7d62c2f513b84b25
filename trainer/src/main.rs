use anyhow::{bail, Context, Result};
use bookcore::catalog::read_catalog;
use bookcore::persist::{
    save_embeddings, save_genre_model, save_meta, save_vectorizer, Embeddings, MetaFile,
    ModelPaths, ARTIFACT_VERSION,
};
use bookcore::vectorizer::SparseVec;
use bookcore::{GenreModel, KeywordExtractor, Vectorizer};
use clap::{Parser, Subcommand};
use oorandom::Rand32;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

// Matches the original training pipeline's random_state.
const SEED: u64 = 42;

#[derive(Parser)]
#[command(name = "trainer")]
#[command(about = "Build offline ML artifacts from the book catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the genre classifier and persist the serving bundle
    TrainGenre {
        /// Catalog CSV path
        #[arg(long)]
        input: String,
        /// Output artifact directory
        #[arg(long, default_value = "model")]
        model_dir: String,
        #[arg(long, default_value_t = 20)]
        epochs: usize,
        #[arg(long, default_value_t = 0.5)]
        learning_rate: f32,
    },
    /// Dump the top keywords of every summary to a JSON file
    ExtractTags {
        #[arg(long)]
        input: String,
        #[arg(long, default_value = "data/book_tags.json")]
        output: String,
    },
    /// Write TF-IDF summary embeddings for downstream consumers
    Embeddings {
        #[arg(long)]
        input: String,
        #[arg(long, default_value = "data/ml")]
        output_dir: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::TrainGenre { input, model_dir, epochs, learning_rate } => {
            train_genre(&input, &model_dir, epochs, learning_rate)
        }
        Commands::ExtractTags { input, output } => extract_tags(&input, &output),
        Commands::Embeddings { input, output_dir } => embeddings(&input, &output_dir),
    }
}

fn train_genre(input: &str, model_dir: &str, epochs: usize, lr: f32) -> Result<()> {
    let rows = read_catalog(input)?;
    let mut examples: Vec<(String, String)> = rows
        .iter()
        .filter_map(|r| Some((r.summary()?.to_string(), r.genre()?.to_string())))
        .collect();
    if examples.is_empty() {
        bail!("no rows with both a summary and a genre in {input}");
    }

    let mut rng = Rand32::new(SEED);
    shuffle(&mut examples, &mut rng);

    // 80/20 split, at least one training example.
    let split = ((examples.len() * 4) / 5).max(1);
    let (train, eval) = examples.split_at(split);
    tracing::info!(train = train.len(), eval = eval.len(), "dataset split");

    let mut classes: Vec<String> = train.iter().map(|(_, g)| g.clone()).collect();
    classes.sort_unstable();
    classes.dedup();

    let summaries: Vec<&str> = train.iter().map(|(s, _)| s.as_str()).collect();
    let vectorizer = Vectorizer::fit(&summaries, 2, Some(8000));
    tracing::info!(num_features = vectorizer.num_features(), num_classes = classes.len(), "feature space fitted");

    let train_set: Vec<(SparseVec, usize)> = train
        .iter()
        .map(|(s, g)| {
            let label = classes.binary_search(g).unwrap_or(0);
            (vectorizer.transform(s), label)
        })
        .collect();

    let mut model = GenreModel::new(classes.clone(), vectorizer.num_features());
    let mut order: Vec<usize> = (0..train_set.len()).collect();
    for epoch in 0..epochs {
        shuffle(&mut order, &mut rng);
        for &i in &order {
            let (x, label) = &train_set[i];
            model.train_step(x, *label, lr);
        }
        let correct = train_set
            .iter()
            .filter(|(x, label)| model.predict(x) == classes[*label])
            .count();
        tracing::info!(
            epoch = epoch + 1,
            train_accuracy = correct as f32 / train_set.len() as f32,
            "epoch complete"
        );
    }

    if !eval.is_empty() {
        let correct = eval
            .iter()
            .filter(|(s, g)| model.predict(&vectorizer.transform(s)) == g.as_str())
            .count();
        tracing::info!(
            eval_accuracy = correct as f32 / eval.len() as f32,
            "held-out evaluation"
        );
    }

    let paths = ModelPaths::new(model_dir);
    save_vectorizer(&paths, &vectorizer)?;
    save_genre_model(&paths, &model)?;
    save_meta(
        &paths,
        &MetaFile {
            num_docs: train.len() as u32,
            num_classes: classes.len() as u32,
            created_at: now_rfc3339(),
            version: ARTIFACT_VERSION,
        },
    )?;
    tracing::info!(model_dir, "genre model saved");
    Ok(())
}

fn extract_tags(input: &str, output: &str) -> Result<()> {
    let rows = read_catalog(input)?;
    let extractor = KeywordExtractor::new().with_top_k(5);

    let mut tags: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (pos, row) in rows.iter().enumerate() {
        if let Some(summary) = row.summary() {
            let id = row.index.unwrap_or(pos as u32);
            tags.insert(id, extractor.extract(summary));
        }
    }
    if tags.is_empty() {
        bail!("no rows with a summary in {input}");
    }

    if let Some(parent) = Path::new(output).parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&tags)?;
    fs::write(output, json).with_context(|| format!("writing {output}"))?;
    tracing::info!(output, num_books = tags.len(), "tags saved");
    Ok(())
}

fn embeddings(input: &str, output_dir: &str) -> Result<()> {
    let rows = read_catalog(input)?;
    let mut ids = Vec::new();
    let mut summaries = Vec::new();
    for (pos, row) in rows.iter().enumerate() {
        if let Some(summary) = row.summary() {
            ids.push(row.index.unwrap_or(pos as u32));
            summaries.push(summary.to_string());
        }
    }
    if summaries.is_empty() {
        bail!("no rows with a summary in {input}");
    }

    // Unigram space capped at 5000 features, matching the embedding artifact
    // downstream consumers already expect.
    let vectorizer = Vectorizer::fit(&summaries, 1, Some(5000));
    let vectors = summaries.iter().map(|s| vectorizer.transform(s)).collect();

    let paths = ModelPaths::new(output_dir);
    save_vectorizer(&paths, &vectorizer)?;
    save_embeddings(&paths, &Embeddings { ids, vectors })?;
    tracing::info!(output_dir, num_docs = summaries.len(), "embeddings saved");
    Ok(())
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into())
}

/// Seeded Fisher-Yates shuffle.
fn shuffle<T>(items: &mut [T], rng: &mut Rand32) {
    for i in (1..items.len()).rev() {
        let j = rng.rand_range(0..(i as u32 + 1)) as usize;
        items.swap(i, j);
    }
}
