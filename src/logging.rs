//! Logger initialization module.
//!
//! The terminal belongs to the interface while the application runs, so log records go to a file
//! chosen on the command line instead of standard error.

use std::{fs::File, path::Path};

use color_eyre::eyre::Result;
use env_logger::{Builder, Env, Target};
use log::info;

/// Installs the global logger writing to `log_file`.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Without a file no logger is
/// installed and every record is discarded.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a logger is already installed.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    info!("logging to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_without_file_is_a_no_op() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn test_init_with_unwritable_path_fails() {
        let path = std::env::temp_dir()
            .join("gridseek-missing-directory")
            .join("nested")
            .join("run.log");

        assert!(init(Some(&path)).is_err(), "parent directory does not exist");
    }
}
