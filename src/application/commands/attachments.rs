use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::application::handlers::AppContext;
use crate::infrastructure::attachments::attachment_manager::FileKind;

#[derive(Debug, Args)]
pub struct AttachArgs {
    pub id: u64,

    /// File to copy into the attachments directory
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct DetachArgs {
    pub id: u64,

    /// Stored attachment path, as shown by `show`
    pub file: PathBuf,

    /// Keep the stored copy even when no other task uses it
    #[arg(long)]
    pub keep_file: bool,
}

#[derive(Debug, Args)]
pub struct CleanAttachmentsArgs {
    /// Only list the files that would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run_attach(ctx: &AppContext, args: AttachArgs) -> anyhow::Result<()> {
    // fail before copying anything
    ctx.task_service.get_task(args.id)?;

    let attachments = ctx.attachments()?;
    let stored = attachments.add_attachment(&args.file)?;
    if let Err(e) = ctx.task_service.attach_file(args.id, stored.clone()) {
        attachments.remove_attachment(&stored);
        return Err(e.into());
    }

    println!(
        "📎 Attached {} to task #{} ({})",
        stored.display(),
        args.id,
        FileKind::of(&stored).label()
    );
    Ok(())
}

pub fn run_detach(ctx: &AppContext, args: DetachArgs) -> anyhow::Result<()> {
    let shared = ctx.task_service.detach_file(args.id, &args.file)?;
    println!("📎 Detached {} from task #{}", args.file.display(), args.id);

    if !shared && !args.keep_file && ctx.attachments()?.remove_attachment(&args.file) {
        println!("   Deleted {}", args.file.display());
    }
    Ok(())
}

/// Deletes files in the attachments directory that no task refers to
pub fn run_clean_attachments(ctx: &AppContext, args: CleanAttachmentsArgs) -> anyhow::Result<()> {
    let attachments = ctx.attachments()?;
    let orphans = attachments.orphaned_files(&ctx.task_service.referenced_attachments())?;

    if orphans.is_empty() {
        println!("🧹 No unused attachments.");
        return Ok(());
    }

    if args.dry_run {
        for path in &orphans {
            println!("   would delete {}", path.display());
        }
        return Ok(());
    }

    let removed = attachments.clean_unused_attachments(&orphans);
    info!(
        "Cleaned {} unused attachment(s) from {}",
        removed,
        attachments.attachments_dir().display()
    );
    println!("🧹 Deleted {} unused attachment(s).", removed);
    Ok(())
}
