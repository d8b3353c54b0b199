use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Where application log events are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Used by commands that print their results on stdout
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// A configured log file, otherwise stdout
    pub fn from_config(log_file: Option<&Path>) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path.to_path_buf()),
            None => LogTarget::Stdout,
        }
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("logstat=debug,logstat_cli=debug,logstat_core=debug")
    } else {
        EnvFilter::new("logstat=info,logstat_cli=info,logstat_core=info")
    }
}

/// Install the global JSON subscriber.
///
/// For [`LogTarget::File`] the returned guard flushes the background writer on
/// drop and must be held until the process exits.
pub fn init_logging(verbose: bool, target: &LogTarget) -> Result<Option<WorkerGuard>> {
    let builder = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(verbose));

    let guard = match target {
        LogTarget::Stdout => {
            builder.try_init().map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            None
        }
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            None
        }
        LogTarget::File(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("log_file has no file name: {}", path.display()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            Some(guard)
        }
    };

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_config() {
        assert_eq!(LogTarget::from_config(None), LogTarget::Stdout);
        assert_eq!(
            LogTarget::from_config(Some(Path::new("logs/app.log"))),
            LogTarget::File(PathBuf::from("logs/app.log"))
        );
    }
}
