use clap::Subcommand;

use billcycle_core::BookStorage;

use crate::cli::{output, CliContext};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Snapshot the current book
    Create {
        #[arg(long)]
        note: Option<String>,
    },
    /// Snapshots of the current book, newest first
    List,
    /// Replace the book with a snapshot
    Restore {
        /// Backup file name as shown by `backup list`.
        id: String,
    },
}

pub fn run(context: &mut CliContext, command: BackupCommand) -> Result<(), AppError> {
    match command {
        BackupCommand::Create { note } => {
            let info = context.storage().backup_book(
                context.book_name(),
                context.book(),
                note.as_deref(),
            )?;
            output::success(format!("Backup written: {}", info.id));
            Ok(())
        }
        BackupCommand::List => {
            let backups = context.storage().list_backups(context.book_name())?;
            output::section(format!("Backups of {}", context.book_name()));
            if backups.is_empty() {
                output::info("No backups yet.");
            }
            for backup in backups {
                output::row(&[backup.id, backup.created_at]);
            }
            Ok(())
        }
        BackupCommand::Restore { id } => {
            let backup = context
                .storage()
                .list_backups(context.book_name())?
                .into_iter()
                .find(|backup| backup.id == id)
                .ok_or_else(|| AppError::Input(format!("no backup named `{}`", id)))?;
            let book = context.storage().restore_backup(&backup)?;
            context.replace_book(book);
            output::success(format!("Restored {}", id));
            Ok(())
        }
    }
}
