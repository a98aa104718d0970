//! CLI output formatting.
//!
//! # Output Format
//!
//! Progress lines are printed as each image finishes (directory runs finish
//! in whatever order the workers complete):
//!
//! ```text
//! Processing photos/ → photos/ (3 images)
//! IMG_1316.jpg (4032x3024)
//!     medium: IMG_1316_md.jpg (1008x756)
//!     thumbnail: IMG_1316_sq_thumb.jpg (189x189)
//! broken.jpg
//!     failed: failed to decode photos/broken.jpg: ...
//! ```
//!
//! followed by a one-line summary:
//!
//! ```text
//! Processed 2 images (4 files written), 1 failed
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or `String`) for
//! testability; the `print_*` wrappers write to stdout. Format functions do no
//! I/O.

use crate::imaging::GeneratedImage;
use crate::process::{BatchReport, ProcessEvent};
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Last path component for display, falling back to the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn generated_line(label: &str, image: &GeneratedImage) -> String {
    format!(
        "{}{}: {} ({}x{})",
        indent(1),
        label,
        display_name(&image.path),
        image.width,
        image.height
    )
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            input,
            output_dir,
            image_count,
        } => vec![format!(
            "Processing {} \u{2192} {} ({})",
            input.display(),
            output_dir.display(),
            plural(*image_count, "image")
        )],
        ProcessEvent::ImageProcessed(outcome) => vec![
            format!(
                "{} ({})",
                display_name(&outcome.source),
                outcome.dimensions
            ),
            generated_line("medium", &outcome.medium),
            generated_line("thumbnail", &outcome.thumbnail),
        ],
        ProcessEvent::ImageFailed(failure) => vec![
            display_name(&failure.source),
            format!("{}failed: {}", indent(1), failure.error),
        ],
    }
}

/// One-line summary of a finished run.
pub fn format_summary(report: &BatchReport) -> String {
    let mut line = format!(
        "Processed {} ({} written)",
        plural(report.processed.len(), "image"),
        plural(report.output_count(), "file")
    );
    if !report.failed.is_empty() {
        line.push_str(&format!(", {} failed", report.failed.len()));
    }
    line
}

/// Pretty-printed JSON for `--json`.
pub fn format_report_json(report: &BatchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(report: &BatchReport) {
    println!("{}", format_summary(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::process::{FailedImage, ImageOutcome};
    use std::path::PathBuf;

    fn outcome() -> ImageOutcome {
        ImageOutcome {
            source: PathBuf::from("photos/IMG_1316.jpg"),
            dimensions: Dimensions {
                width: 2000,
                height: 1500,
            },
            medium: GeneratedImage {
                path: PathBuf::from("out/IMG_1316_md.jpg"),
                width: 1000,
                height: 750,
            },
            thumbnail: GeneratedImage {
                path: PathBuf::from("out/IMG_1316_sq_thumb.jpg"),
                width: 375,
                height: 375,
            },
        }
    }

    fn report(processed: usize, failed: usize) -> BatchReport {
        BatchReport {
            input: PathBuf::from("photos"),
            output_dir: PathBuf::from("out"),
            processed: vec![outcome(); processed],
            failed: vec![
                FailedImage {
                    source: PathBuf::from("photos/broken.jpg"),
                    error: "failed to decode".into(),
                };
                failed
            ],
        }
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(4, "file"), "4 files");
    }

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("a/b/c.jpg")), "c.jpg");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn format_started_event() {
        let lines = format_process_event(&ProcessEvent::Started {
            input: PathBuf::from("photos"),
            output_dir: PathBuf::from("out"),
            image_count: 3,
        });
        assert_eq!(lines, vec!["Processing photos \u{2192} out (3 images)"]);
    }

    #[test]
    fn format_processed_event() {
        let lines = format_process_event(&ProcessEvent::ImageProcessed(outcome()));
        assert_eq!(
            lines,
            vec![
                "IMG_1316.jpg (2000x1500)",
                "    medium: IMG_1316_md.jpg (1000x750)",
                "    thumbnail: IMG_1316_sq_thumb.jpg (375x375)",
            ]
        );
    }

    #[test]
    fn format_failed_event() {
        let lines = format_process_event(&ProcessEvent::ImageFailed(FailedImage {
            source: PathBuf::from("photos/broken.jpg"),
            error: "failed to decode photos/broken.jpg".into(),
        }));
        assert_eq!(
            lines,
            vec![
                "broken.jpg",
                "    failed: failed to decode photos/broken.jpg"
            ]
        );
    }

    #[test]
    fn summary_without_failures() {
        assert_eq!(
            format_summary(&report(2, 0)),
            "Processed 2 images (4 files written)"
        );
    }

    #[test]
    fn summary_with_failures() {
        assert_eq!(
            format_summary(&report(1, 2)),
            "Processed 1 image (2 files written), 2 failed"
        );
    }

    #[test]
    fn report_json_has_outputs() {
        let json = format_report_json(&report(1, 1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["output_dir"], "out");
        assert_eq!(
            value["processed"][0]["medium"]["path"],
            "out/IMG_1316_md.jpg"
        );
        assert_eq!(value["processed"][0]["thumbnail"]["width"], 375);
        assert_eq!(value["processed"][0]["dimensions"]["height"], 1500);
        assert_eq!(value["failed"][0]["source"], "photos/broken.jpg");
    }
}
