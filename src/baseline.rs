use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::distributions::Uniform;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::data::{count_distinct, count_rows, load_labels};
use crate::error::{BaselineError, Result};
use crate::io::TextSink;

/// Output file naming used by the different benchmark pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputLayout {
    /// `{name}_clusters.txt` and `{name}_meta.txt`
    #[default]
    Plain,
    /// `{name}_JHDC_clusters.txt` and `{name}_JHDC_meta.txt`
    Jhdc,
    /// gzipped `{name}_ks_range.labels.gz`, plus the JHDC text and meta files
    KsRange,
}

impl OutputLayout {
    /// Label file names, primary output first.
    pub fn label_files(self, name: &str) -> Vec<String> {
        match self {
            Self::Plain => vec![format!("{name}_clusters.txt")],
            Self::Jhdc => vec![format!("{name}_JHDC_clusters.txt")],
            Self::KsRange => vec![
                format!("{name}_ks_range.labels.gz"),
                format!("{name}_JHDC_clusters.txt"),
            ],
        }
    }

    pub fn meta_file(self, name: &str) -> String {
        match self {
            Self::Plain => format!("{name}_meta.txt"),
            Self::Jhdc | Self::KsRange => format!("{name}_JHDC_meta.txt"),
        }
    }
}

/// Inputs for one baseline run.
#[derive(Debug, Clone)]
pub struct BaselineConfig {
    pub matrix_path: PathBuf,
    pub true_labels_path: PathBuf,
    pub output_dir: PathBuf,
    pub name: String,
    pub seed: u64,
    pub layout: OutputLayout,
}

impl BaselineConfig {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(
        matrix_path: impl Into<PathBuf>,
        true_labels_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            matrix_path: matrix_path.into(),
            true_labels_path: true_labels_path.into(),
            output_dir: output_dir.into(),
            name: name.into(),
            seed: Self::DEFAULT_SEED,
            layout: OutputLayout::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn label_paths(&self) -> Vec<PathBuf> {
        self.layout
            .label_files(&self.name)
            .into_iter()
            .map(|f| self.output_dir.join(f))
            .collect()
    }

    pub fn meta_path(&self) -> PathBuf {
        self.output_dir.join(self.layout.meta_file(&self.name))
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineRun {
    /// The label file downstream consumers should read
    pub primary: PathBuf,
    /// Every file written, label files first, metadata last
    pub written: Vec<PathBuf>,
    pub seed: u64,
    pub n_samples: usize,
    pub n_clusters: usize,
}

/// Draw `n_samples` labels uniformly from `0..n_clusters`.
///
/// The sequence depends only on the three arguments: ChaCha8 has a fixed
/// output stream across `rand_chacha` releases, and draws are taken as `u64`
/// so 32- and 64-bit builds agree. Returns an empty vector when there are no
/// clusters to draw from.
pub fn sample_labels(seed: u64, n_samples: usize, n_clusters: usize) -> Vec<usize> {
    if n_clusters == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let between = Uniform::new(0, n_clusters as u64);
    (0..n_samples)
        .map(|_| rng.sample(between) as usize)
        .collect()
}

/// Produce a random baseline clustering as described by `config`.
///
/// The row-count check runs before anything is written, so a mismatch leaves
/// no output files behind (the output directory itself is still created).
pub fn generate(config: &BaselineConfig) -> Result<BaselineRun> {
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| BaselineError::output(&config.output_dir, e))?;

    let truth = load_labels(&config.true_labels_path)?;
    let n_samples = truth.len();
    let n_clusters = count_distinct(&truth);
    info!(
        n_samples,
        n_clusters,
        path = %config.true_labels_path.display(),
        "loaded true labels"
    );

    let matrix_rows = count_rows(&config.matrix_path)?;
    debug!(matrix_rows, path = %config.matrix_path.display(), "counted matrix rows");
    if matrix_rows != n_samples {
        return Err(BaselineError::Validation {
            matrix_rows,
            label_rows: n_samples,
        });
    }

    let labels = sample_labels(config.seed, n_samples, n_clusters);

    let label_paths = config.label_paths();
    let primary = label_paths[0].clone();
    let mut written = Vec::with_capacity(label_paths.len() + 1);

    for path in label_paths {
        write_text(&path, |sink| {
            for label in &labels {
                writeln!(sink, "{label}")?;
            }
            Ok(())
        })?;
        info!(path = %path.display(), "wrote random labels");
        written.push(path);
    }

    let meta_path = config.meta_path();
    write_text(&meta_path, |sink| {
        writeln!(sink, "seed: {}", config.seed)?;
        writeln!(sink, "n_samples: {n_samples}")?;
        writeln!(sink, "n_clusters: {n_clusters}")
    })?;
    debug!(path = %meta_path.display(), "wrote metadata");
    written.push(meta_path);

    Ok(BaselineRun {
        primary,
        written,
        seed: config.seed,
        n_samples,
        n_clusters,
    })
}

fn write_text(path: &Path, body: impl FnOnce(&mut TextSink) -> io::Result<()>) -> Result<()> {
    TextSink::create(path)
        .and_then(|mut sink| {
            body(&mut sink)?;
            sink.finish()
        })
        .map_err(|e| BaselineError::output(path, e))
}
