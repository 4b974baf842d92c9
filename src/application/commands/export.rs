use clap::Args;
use std::path::PathBuf;

use crate::application::handlers::AppContext;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination CSV file
    #[arg(default_value = "tasks.csv")]
    pub output: PathBuf,
}

pub fn run_export(ctx: &AppContext, args: ExportArgs) -> anyhow::Result<()> {
    let count = ctx.task_service.export_csv(&args.output)?;
    println!("📤 Exported {} task(s) to {}", count, args.output.display());
    Ok(())
}
