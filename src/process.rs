//! Path orchestration: turn input JPEGs into medium copies and thumbnails.
//!
//! Given a file or a directory, every input JPEG produces two files in the
//! output directory:
//!
//! ```text
//! out/
//! ├── IMG_1316_md.jpg         # medium copy, adaptive integer downscale
//! └── IMG_1316_sq_thumb.jpg   # centered square crop of a smaller copy
//! ```
//!
//! ## Output directory
//!
//! An explicit output directory is used only if it already exists. Otherwise
//! outputs land next to the input: in the file's parent directory, or in the
//! input directory itself.
//!
//! ## Directory runs
//!
//! Only regular files with a `.jpg` extension (any case) directly inside the
//! directory are processed; subdirectories are not descended into. Files are
//! processed in parallel using [rayon](https://docs.rs/rayon). A file that
//! fails is reported and does not stop the others. Two inputs whose outputs
//! would share a name (`a.jpg` and `a.JPG`) are not both processed: the first
//! in path order wins and the second is reported as failed. When outputs go
//! back into the input directory, inputs that would be overwritten (the
//! outputs of an earlier run) are decoded before any worker writes.

use crate::config::ProcessingConfig;
use crate::imaging::{
    BackendError, Dimensions, GeneratedImage, ImageBackend, RustBackend, create_medium,
    create_thumbnail,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Path doesn't exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{} skipped: outputs named {stem} are already produced by another file", path.display())]
    OutputCollision { path: PathBuf, stem: String },
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Extensions (compared ignoring ASCII case) that directory runs pick up.
pub const INPUT_EXTENSIONS: &[&str] = &["jpg"];

const MEDIUM_SUFFIX: &str = "_md.jpg";
const THUMBNAIL_SUFFIX: &str = "_sq_thumb.jpg";

/// Both outputs of one input image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
    pub source: PathBuf,
    /// Original dimensions.
    pub dimensions: Dimensions,
    pub medium: GeneratedImage,
    pub thumbnail: GeneratedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub source: PathBuf,
    pub error: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub processed: Vec<ImageOutcome>,
    pub failed: Vec<FailedImage>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of files written (two per processed image).
    pub fn output_count(&self) -> usize {
        self.processed.len() * 2
    }
}

/// Progress events emitted during processing.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started {
        input: PathBuf,
        output_dir: PathBuf,
        image_count: usize,
    },
    ImageProcessed(ImageOutcome),
    ImageFailed(FailedImage),
}

fn emit(progress: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A closed receiver only means nobody is listening
        tx.send(event).ok();
    }
}

/// Directory-scan inclusion policy: a regular file with a `.jpg` extension.
pub fn is_candidate(path: &Path) -> bool {
    path.is_file() && has_input_extension(path)
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| INPUT_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)))
}

/// File name without its last extension: `IMG_1316.jpg` → `IMG_1316`.
fn base_name(path: &Path) -> Result<String, ProcessError> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ProcessError::InvalidArgument(format!("{} has no file name", path.display()))
        })
}

/// File names of the medium and thumbnail outputs for `base_name`.
fn output_names(base_name: &str) -> [String; 2] {
    [
        format!("{base_name}{MEDIUM_SUFFIX}"),
        format!("{base_name}{THUMBNAIL_SUFFIX}"),
    ]
}

/// Paths of the medium and thumbnail outputs for `base_name`.
pub fn output_paths(base_name: &str, output_dir: &Path) -> (PathBuf, PathBuf) {
    let [medium, thumbnail] = output_names(base_name);
    (output_dir.join(medium), output_dir.join(thumbnail))
}

/// Decode one image and write its medium copy and thumbnail.
///
/// Existing outputs are overwritten. Nothing is cleaned up on failure, so a
/// thumbnail error can leave the medium copy behind.
pub fn process_image<B: ImageBackend>(
    backend: &B,
    input: &Path,
    output_dir: &Path,
    config: &ProcessingConfig,
) -> Result<ImageOutcome, ProcessError> {
    let (image, dimensions) = decode_input(backend, input)?;
    write_outputs(backend, input, &image, dimensions, output_dir, config)
}

fn decode_input<B: ImageBackend>(
    backend: &B,
    input: &Path,
) -> Result<(B::Image, Dimensions), BackendError> {
    let decoded = backend.decode(input)?;
    tracing::debug!(source = %input.display(), dimensions = %decoded.1, "decoded");
    Ok(decoded)
}

/// Write the medium copy and thumbnail of an already decoded `input`.
fn write_outputs<B: ImageBackend>(
    backend: &B,
    input: &Path,
    image: &B::Image,
    dimensions: Dimensions,
    output_dir: &Path,
    config: &ProcessingConfig,
) -> Result<ImageOutcome, ProcessError> {
    let stem = base_name(input)?;
    let (medium_path, thumbnail_path) = output_paths(&stem, output_dir);
    let medium = create_medium(backend, image, dimensions, &medium_path, config.quality)?;
    tracing::info!(output = %medium_path.display(), "wrote medium copy");
    let thumbnail = create_thumbnail(
        backend,
        image,
        dimensions,
        &thumbnail_path,
        config.thumbnail_quality,
    )?;
    tracing::info!(output = %thumbnail_path.display(), "wrote thumbnail");

    Ok(ImageOutcome {
        source: input.to_path_buf(),
        dimensions,
        medium,
        thumbnail,
    })
}

/// Candidate files directly inside `dir`, sorted by path.
pub fn collect_candidates(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_candidate(p))
        .collect();
    entries.sort();
    Ok(entries)
}

/// Split candidates into those safe to process and those whose outputs would
/// overwrite an earlier candidate's.
fn partition_collisions(candidates: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<FailedImage>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut collisions = Vec::new();

    for path in candidates {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if seen.insert(stem.clone()) {
            unique.push(path);
        } else {
            let error = ProcessError::OutputCollision {
                path: path.clone(),
                stem,
            };
            collisions.push(FailedImage {
                source: path,
                error: error.to_string(),
            });
        }
    }
    (unique, collisions)
}

/// Candidates that a sibling's outputs would overwrite, such as the
/// `_md.jpg` files an earlier run left in the same directory.
fn overwritten_inputs(
    candidates: &[PathBuf],
    input_dir: &Path,
    output_dir: &Path,
) -> HashSet<PathBuf> {
    let same_dir = match (fs::canonicalize(input_dir), fs::canonicalize(output_dir)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    };
    if !same_dir {
        return HashSet::new();
    }

    let outputs: HashSet<String> = candidates
        .iter()
        .filter_map(|p| p.file_stem())
        .flat_map(|stem| output_names(&stem.to_string_lossy()))
        .collect();
    candidates
        .iter()
        .filter(|p| {
            p.file_name()
                .is_some_and(|name| outputs.contains(name.to_string_lossy().as_ref()))
        })
        .cloned()
        .collect()
}

/// Process every candidate JPEG directly inside `input_dir`.
///
/// Per-file failures end up in [`BatchReport::failed`]; only a failure to
/// list the directory itself is returned as an error.
///
/// Inputs that another input's outputs would replace are all decoded before
/// any output is written, so a rerun in place reads the previous outputs
/// whole instead of racing the workers rewriting them.
pub fn process_directory<B: ImageBackend>(
    backend: &B,
    input_dir: &Path,
    output_dir: &Path,
    config: &ProcessingConfig,
    progress: Option<&Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let candidates = collect_candidates(input_dir)?;
    let (unique, mut failed) = partition_collisions(candidates);

    emit(
        progress,
        ProcessEvent::Started {
            input: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            image_count: unique.len() + failed.len(),
        },
    );
    for collision in &failed {
        tracing::warn!(source = %collision.source.display(), "{}", collision.error);
        emit(progress, ProcessEvent::ImageFailed(collision.clone()));
    }

    let overwritten = overwritten_inputs(&unique, input_dir, output_dir);
    if !overwritten.is_empty() {
        tracing::debug!(
            count = overwritten.len(),
            "decoding inputs that outputs will replace"
        );
    }
    let jobs: Vec<(PathBuf, Option<Result<(B::Image, Dimensions), BackendError>>)> = unique
        .into_par_iter()
        .map(|path| {
            let decoded = overwritten
                .contains(&path)
                .then(|| decode_input(backend, &path));
            (path, decoded)
        })
        .collect();

    let results: Vec<Result<ImageOutcome, FailedImage>> = jobs
        .into_par_iter()
        .map(|(path, decoded)| {
            let result = match decoded {
                Some(decoded) => decoded.map_err(ProcessError::from).and_then(
                    |(image, dimensions)| {
                        write_outputs(backend, &path, &image, dimensions, output_dir, config)
                    },
                ),
                None => process_image(backend, &path, output_dir, config),
            };
            match result {
                Ok(outcome) => {
                    emit(progress, ProcessEvent::ImageProcessed(outcome.clone()));
                    Ok(outcome)
                }
                Err(e) => {
                    tracing::warn!(source = %path.display(), error = %e, "image failed");
                    let failure = FailedImage {
                        source: path,
                        error: e.to_string(),
                    };
                    emit(progress, ProcessEvent::ImageFailed(failure.clone()));
                    Err(failure)
                }
            }
        })
        .collect();

    let mut processed = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => processed.push(outcome),
            Err(failure) => failed.push(failure),
        }
    }
    failed.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(BatchReport {
        input: input_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        processed,
        failed,
    })
}

/// Where outputs for `input` go when the caller asked for `output`.
pub fn resolve_output_dir(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => return dir.to_path_buf(),
        Some(dir) if !dir.as_os_str().is_empty() => {
            tracing::warn!(
                output = %dir.display(),
                "output is not an existing directory, writing next to the input instead"
            );
        }
        _ => {}
    }

    if input.is_dir() {
        input.to_path_buf()
    } else {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }
}

/// Process a single file or a directory of files with the default backend.
pub fn process(
    input: &Path,
    output: Option<&Path>,
    config: &ProcessingConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    process_path(&RustBackend::new(), input, output, config, progress)
}

/// Process a single file or a directory of files using a specific backend.
///
/// Fails with [`ProcessError::NotFound`] before writing anything when `input`
/// is missing, and with [`ProcessError::InvalidArgument`] when it is neither a
/// regular file nor a directory.
pub fn process_path<B: ImageBackend>(
    backend: &B,
    input: &Path,
    output: Option<&Path>,
    config: &ProcessingConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    config
        .validate()
        .map_err(|e| ProcessError::InvalidArgument(e.to_string()))?;

    let metadata = match fs::metadata(input) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ProcessError::NotFound(input.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() && !metadata.is_dir() {
        return Err(ProcessError::InvalidArgument(format!(
            "{} is neither a file nor a directory",
            input.display()
        )));
    }

    let output_dir = resolve_output_dir(input, output);
    fs::create_dir_all(&output_dir)?;

    if metadata.is_dir() {
        return process_directory(backend, input, &output_dir, config, progress.as_ref());
    }

    emit(
        progress.as_ref(),
        ProcessEvent::Started {
            input: input.to_path_buf(),
            output_dir: output_dir.clone(),
            image_count: 1,
        },
    );
    let outcome = process_image(backend, input, &output_dir, config)?;
    emit(
        progress.as_ref(),
        ProcessEvent::ImageProcessed(outcome.clone()),
    );

    Ok(BatchReport {
        input: input.to_path_buf(),
        output_dir,
        processed: vec![outcome],
        failed: Vec::new(),
    })
}
