use std::path::Path;

use ms_config::MailsortConfig;

use crate::output::write_report;
use crate::pipeline::run_pipeline;

/// Handle `mailsort run`.
pub async fn handle(input: &Path, output: &Path, config: &MailsortConfig) -> anyhow::Result<()> {
    let report = run_pipeline(input, config).await?;
    let written = write_report(&report, output)?;
    println!("Wrote results to {}", written.display());
    Ok(())
}
