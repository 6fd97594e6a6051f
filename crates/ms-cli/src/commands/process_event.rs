//! Local rendition of the queue worker: one event in, one labeled blob out.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use ms_config::MailsortConfig;
use ms_ingest::{classified_output_name, find_blob_name, parse_event_message};

use crate::output::write_report;
use crate::pipeline::run_pipeline;

/// Handle `mailsort process-event`.
pub async fn handle(
    message_file: &Path,
    input_dir: &Path,
    output_dir: &Path,
    container: &str,
    config: &MailsortConfig,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(message_file)
        .with_context(|| format!("failed to read {}", message_file.display()))?;
    let (input, output) = resolve_paths(&content, input_dir, output_dir, container)?;
    tracing::info!(input = %input.display(), "processing event blob");

    let report = run_pipeline(&input, config).await?;
    let written = write_report(&report, &output)?;
    println!("Wrote results to {}", written.display());
    Ok(())
}

/// Input blob path and output report path for one queue message.
fn resolve_paths(
    content: &str,
    input_dir: &Path,
    output_dir: &Path,
    container: &str,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let message = parse_event_message(content)
        .context("queue message is neither JSON nor base64-encoded JSON")?;
    let blob = find_blob_name(&message, container)
        .with_context(|| format!("no event references a blob in container '{container}'"))?;
    if !is_contained(Path::new(&blob)) {
        anyhow::bail!("blob name '{blob}' escapes the container directory");
    }
    Ok((
        input_dir.join(&blob),
        output_dir.join(classified_output_name(&blob)),
    ))
}

/// A non-empty relative path made only of plain segments.
fn is_contained(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
