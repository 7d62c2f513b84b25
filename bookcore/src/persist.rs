use crate::error::{Error, Result};
use crate::genre::{GenreModel, GenrePredictor};
use crate::vectorizer::{SparseVec, Vectorizer};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// On-disk artifact format version; bumped on any layout change.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_classes: u32,
    pub created_at: String,
    pub version: u32,
}

/// Per-document summary embeddings, an artifact for downstream consumers
/// (the server does not read it).
#[derive(Debug, Serialize, Deserialize)]
pub struct Embeddings {
    pub ids: Vec<u32>,
    pub vectors: Vec<SparseVec>,
}

pub struct ModelPaths {
    pub root: PathBuf,
}

impl ModelPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn vectorizer(&self) -> PathBuf {
        self.root.join("vectorizer.bin")
    }
    fn genre_model(&self) -> PathBuf {
        self.root.join("genre_model.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
    fn embeddings(&self) -> PathBuf {
        self.root.join("embeddings.bin")
    }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let mut f = File::open(path)
        .map_err(|e| Error::Artifact(format!("{}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    bincode::deserialize(&buf)
        .map_err(|e| Error::Artifact(format!("{}: {e}", path.display())))
}

pub fn save_vectorizer(paths: &ModelPaths, vectorizer: &Vectorizer) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.vectorizer(), vectorizer)
}

pub fn load_vectorizer(paths: &ModelPaths) -> Result<Vectorizer> {
    read_bincode(&paths.vectorizer())
}

pub fn save_genre_model(paths: &ModelPaths, model: &GenreModel) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.genre_model(), model)
}

pub fn load_genre_model(paths: &ModelPaths) -> Result<GenreModel> {
    read_bincode(&paths.genre_model())
}

pub fn save_embeddings(paths: &ModelPaths, embeddings: &Embeddings) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.embeddings(), embeddings)
}

pub fn load_embeddings(paths: &ModelPaths) -> Result<Embeddings> {
    read_bincode(&paths.embeddings())
}

pub fn save_meta(paths: &ModelPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| Error::Artifact(e.to_string()))?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &ModelPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())
        .map_err(|e| Error::Artifact(format!("{}: {e}", paths.meta().display())))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)
        .map_err(|e| Error::Artifact(format!("{}: {e}", paths.meta().display())))?;
    if meta.version != ARTIFACT_VERSION {
        return Err(Error::Artifact(format!(
            "unsupported artifact version {} (expected {ARTIFACT_VERSION})",
            meta.version
        )));
    }
    Ok(meta)
}

/// Load the full serving bundle: meta (with version check), vectorizer,
/// and genre model, paired into a predictor.
pub fn load_predictor(paths: &ModelPaths) -> Result<GenrePredictor> {
    let meta = load_meta(paths)?;
    let vectorizer = load_vectorizer(paths)?;
    let model = load_genre_model(paths)?;
    tracing::info!(
        num_classes = meta.num_classes,
        num_features = vectorizer.num_features(),
        "genre model loaded"
    );
    GenrePredictor::new(vectorizer, model)
}
