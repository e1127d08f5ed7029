//! Batch stripping: bounded parallel workers, progress, and streaming reports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use veil_core::{DiscoveredFile, OutputFormat, ReportFormat};

use super::{strip_file, FileReport, StripArgs, StripContext};

/// Strip every discovered file into `out_dir`, mirroring the input layout.
///
/// At most `ctx.workers` files are in flight at once, each on a blocking
/// thread. JSON Lines reports stream as files finish; JSON reports are
/// collected and written as one array sorted by input path.
pub async fn strip_batch(
    ctx: StripContext,
    args: &StripArgs,
    out_dir: &Path,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let progress = create_progress_bar(files.len() as u64);
    let mut writer = crate::cli::report_writer(args.report.as_deref(), ctx.format, ctx.pretty)?;

    let semaphore = Arc::new(Semaphore::new(ctx.workers));
    let mut tasks = JoinSet::new();
    let mut skipped: u64 = 0;
    let mut total_bytes: u64 = 0;
    let start_time = Instant::now();
    let mut planner = OutputPlanner::default();

    for file in files {
        let output = planner.assign(&args.input, out_dir, &file.path);
        if args.skip_existing && output.exists() {
            skipped += 1;
            progress.inc(1);
            continue;
        }
        total_bytes += file.size;

        let veil = Arc::clone(&ctx.veil);
        let policy = ctx.policy.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return failed(file.path, "worker pool closed".to_string());
            };
            let input = file.path.clone();
            tokio::task::spawn_blocking(move || strip_file(&veil, &file.path, &output, policy.as_ref()))
                .await
                .unwrap_or_else(|e| failed(input, format!("worker panicked: {e}")))
        });
    }

    let mut succeeded: u64 = 0;
    let mut failed_count: u64 = 0;
    let mut collected = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let report = match joined {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Worker task failed: {e}");
                failed_count += 1;
                progress.inc(1);
                continue;
            }
        };

        if report.error.is_some() {
            failed_count += 1;
        } else {
            succeeded += 1;
        }

        match ctx.format {
            ReportFormat::JsonLines => writer.write(&report)?,
            ReportFormat::Json => collected.push(report),
        }

        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let rate = (succeeded + failed_count) as f64 / elapsed;
            progress.set_message(format!("{:.1} img/sec", rate));
        }
    }

    if ctx.format == ReportFormat::Json {
        collected.sort_by(|a, b| a.input.cmp(&b.input));
        writer.write_all(&collected)?;
    }
    writer.flush()?;
    if let Some(path) = &args.report {
        tracing::info!("Report written to {:?}", path);
    }

    let elapsed = start_time.elapsed();
    progress.finish_and_clear();
    print_summary(
        Summary {
            succeeded,
            failed: failed_count,
            skipped,
            total_bytes,
        },
        elapsed,
        out_dir,
    );

    if failed_count > 0 {
        anyhow::bail!("{failed_count} file(s) could not be sanitized");
    }
    Ok(())
}

fn failed(input: PathBuf, error: String) -> FileReport {
    FileReport {
        input,
        output: None,
        report: None,
        error: Some(error),
    }
}

/// Where the clean copy of `file` goes: same relative path under `out_dir`,
/// with the extension of the container it will be written as.
fn output_path(root: &Path, out_dir: &Path, file: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("image"));
    let format = OutputFormat::from_extension(&crate::cli::extension_of(file));
    out_dir.join(relative).with_extension(format.extension())
}

/// Hands out one output path per input so that concurrent workers never
/// write the same file. `a.jpg` and `a.tiff` both want `a.jpg`; the second
/// keeps its source extension and becomes `a.tiff.jpg`.
#[derive(Default)]
struct OutputPlanner {
    taken: HashSet<PathBuf>,
}

impl OutputPlanner {
    fn assign(&mut self, root: &Path, out_dir: &Path, file: &Path) -> PathBuf {
        let preferred = output_path(root, out_dir, file);
        if self.taken.insert(preferred.clone()) {
            return preferred;
        }

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let ext = OutputFormat::from_extension(&crate::cli::extension_of(file)).extension();
        let mut candidate = preferred.with_file_name(format!("{name}.{ext}"));
        let mut n = 1;
        while !self.taken.insert(candidate.clone()) {
            candidate = preferred.with_file_name(format!("{name}-{n}.{ext}"));
            n += 1;
        }
        tracing::debug!("{:?} collides with another input, writing {:?}", file, candidate);
        candidate
    }
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

struct Summary {
    succeeded: u64,
    failed: u64,
    skipped: u64,
    total_bytes: u64,
}

/// Print a formatted summary table after the batch.
fn print_summary(summary: Summary, elapsed: std::time::Duration, out_dir: &Path) {
    let total = summary.succeeded + summary.failed + summary.skipped;
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        summary.succeeded as f64 / secs
    } else {
        0.0
    };
    let throughput = if secs > 0.0 {
        summary.total_bytes as f64 / 1_000_000.0 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Sanitized:    {:>8}", summary.succeeded);
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed);
    }
    if summary.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", summary.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", secs);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("    Output:       {}", out_dir.display());
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::ReportFormatArg;
    use veil_core::Config;

    fn batch_args(input: PathBuf, report: PathBuf) -> StripArgs {
        StripArgs {
            input,
            output: None,
            format: Some(ReportFormatArg::Jsonl),
            report: Some(report),
            selective: false,
            tags: Vec::new(),
            parallel: Some(2),
            skip_existing: false,
        }
    }

    #[test]
    fn test_output_path_mirrors_layout() {
        let out = output_path(
            Path::new("/pics"),
            Path::new("/pics/veil-clean"),
            Path::new("/pics/2024/trip/IMG_1.JPEG"),
        );
        assert_eq!(out, PathBuf::from("/pics/veil-clean/2024/trip/IMG_1.jpg"));

        let out = output_path(Path::new("/pics"), Path::new("/out"), Path::new("/pics/a.tiff"));
        assert_eq!(out, PathBuf::from("/out/a.jpg"));
    }

    #[test]
    fn test_planner_disambiguates_shared_stem() {
        let root = Path::new("/in");
        let out_dir = Path::new("/in/veil-clean");
        let mut planner = OutputPlanner::default();

        let a = planner.assign(root, out_dir, Path::new("/in/a.jpeg"));
        let b = planner.assign(root, out_dir, Path::new("/in/a.jpg"));
        let c = planner.assign(root, out_dir, Path::new("/in/a.tiff"));
        assert_eq!(a, PathBuf::from("/in/veil-clean/a.jpg"));
        assert_eq!(b, PathBuf::from("/in/veil-clean/a.jpg.jpg"));
        assert_eq!(c, PathBuf::from("/in/veil-clean/a.tiff.jpg"));

        // an input already named like a fallback still gets its own file
        let d = planner.assign(root, out_dir, Path::new("/in/a.jpg.jpg"));
        assert_eq!(d, PathBuf::from("/in/veil-clean/a.jpg.jpg.jpg"));
        let e = planner.assign(root, out_dir, Path::new("/in/a.tiff"));
        assert_eq!(e, PathBuf::from("/in/veil-clean/a.tiff-1.jpg"));
    }

    #[tokio::test]
    async fn test_batch_shared_stem_writes_separate_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photos");
        std::fs::create_dir_all(&input).unwrap();
        image::DynamicImage::new_rgb8(10, 10)
            .save(input.join("a.jpg"))
            .unwrap();
        image::DynamicImage::new_rgb8(12, 12)
            .save(input.join("a.jpeg"))
            .unwrap();

        let report_path = dir.path().join("report.jsonl");
        let args = batch_args(input.clone(), report_path.clone());
        super::super::execute(args, Config::default()).await.unwrap();

        let content = std::fs::read_to_string(&report_path).unwrap();
        let outputs: HashSet<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["output"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(outputs.len(), 2);
        for output in &outputs {
            assert!(Path::new(output).exists(), "{output} missing");
        }

        let sizes: HashSet<(u32, u32)> = outputs
            .iter()
            .map(|output| image::image_dimensions(output).unwrap())
            .collect();
        assert_eq!(sizes.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_strips_directory_and_streams_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photos");
        std::fs::create_dir_all(input.join("nested")).unwrap();
        image::DynamicImage::new_rgb8(10, 10)
            .save(input.join("a.png"))
            .unwrap();
        image::DynamicImage::new_rgb8(10, 10)
            .save(input.join("nested").join("b.png"))
            .unwrap();
        std::fs::write(input.join("notes.txt"), b"skip me").unwrap();

        let report_path = dir.path().join("report.jsonl");
        let args = batch_args(input.clone(), report_path.clone());
        super::super::execute(args, Config::default()).await.unwrap();

        assert!(input.join("veil-clean").join("a.png").exists());
        assert!(input.join("veil-clean").join("nested").join("b.png").exists());

        let content = std::fs::read_to_string(&report_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        for line in content.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["verification"]["success"], true);
        }
    }

    #[tokio::test]
    async fn test_batch_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photos");
        std::fs::create_dir_all(&input).unwrap();
        image::DynamicImage::new_rgb8(10, 10)
            .save(input.join("good.png"))
            .unwrap();
        std::fs::write(input.join("bad.jpg"), b"\xFF\xD8\xFFnot really").unwrap();

        let report_path = dir.path().join("report.jsonl");
        let args = batch_args(input.clone(), report_path.clone());
        assert!(super::super::execute(args, Config::default()).await.is_err());

        let content = std::fs::read_to_string(&report_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"error\""));
        assert!(input.join("veil-clean").join("good.png").exists());
    }

    #[tokio::test]
    async fn test_batch_skip_existing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photos");
        std::fs::create_dir_all(input.join("veil-clean")).unwrap();
        image::DynamicImage::new_rgb8(10, 10)
            .save(input.join("a.png"))
            .unwrap();
        std::fs::write(input.join("veil-clean").join("a.png"), b"already here").unwrap();

        let report_path = dir.path().join("report.jsonl");
        let mut args = batch_args(input.clone(), report_path.clone());
        args.skip_existing = true;
        super::super::execute(args, Config::default()).await.unwrap();

        let existing = std::fs::read(input.join("veil-clean").join("a.png")).unwrap();
        assert_eq!(existing, b"already here");
        assert_eq!(std::fs::read_to_string(&report_path).unwrap().lines().count(), 0);
    }
}
