//! Logger initialization for the terminal front end.
//!
//! The editor owns the terminal (raw mode, alternate screen) while it runs,
//! so logs either go to a file or are kept to warnings on stderr.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "sketch3d_core=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            file: None,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored and leave
/// any log file untouched.
pub fn init_logging(config: LoggingConfig) -> std::io::Result<()> {
    let mut result = Ok(());

    INIT.call_once(|| {
        let target = match &config.file {
            Some(path) => match File::create(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    result = Err(e);
                    return;
                }
            },
            None => None,
        };

        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        match target {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
                builder.write_style(env_logger::WriteStyle::Never);
            }
            None => {
                builder.write_style(config.write_style);
            }
        }

        if builder.try_init().is_err() {
            return;
        }
        log::debug!("logging initialized");
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_second_init_leaves_file_untouched() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let first = dir.join(format!("sketch3d-log-{}-first.txt", id));
        let second = dir.join(format!("sketch3d-log-{}-second.txt", id));

        init_logging(LoggingConfig {
            file: Some(first.clone()),
            ..LoggingConfig::default()
        })
        .unwrap();
        assert!(first.exists());

        fs::write(&second, "earlier session\n").unwrap();
        init_logging(LoggingConfig {
            file: Some(second.clone()),
            ..LoggingConfig::default()
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&second).unwrap(), "earlier session\n");

        let _ = fs::remove_file(&first);
        let _ = fs::remove_file(&second);
    }
}
