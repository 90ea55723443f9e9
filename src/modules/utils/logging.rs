use env_logger::{Builder, WriteStyle};
use log::{error, info, warn, LevelFilter};
use std::fs::OpenOptions;
use std::path::Path;

/// Initialize the logging system, appending to the given log file
pub fn initialize_logging(
    log_file: &Path,
    level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Create or append to log file with proper permissions
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    info!("Logging system initialized at level {}", level);
    Ok(())
}

/// Helper function to mask sensitive data such as emails for logging
pub fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Structured logging for authentication events
pub fn log_auth_event(event_type: &str, email: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Auth event: type={}, user={}, success=true, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    } else {
        warn!(
            "Auth event: type={}, user={}, success=false, timestamp={}, details={:?}",
            event_type,
            format_sensitive(email),
            timestamp,
            details
        );
    }
}

/// Structured logging for data operations
pub fn log_data_operation(operation: &str, resource: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Data operation: op={}, resource={}, success=true, timestamp={}, details={:?}",
            operation, resource, timestamp, details
        );
    } else {
        error!(
            "Data operation: op={}, resource={}, success=false, timestamp={}, details={:?}",
            operation, resource, timestamp, details
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sensitive_data_formatting() {
        assert_eq!(format_sensitive("a@b.com"), "a@***om");
        assert_eq!(format_sensitive("key"), "***");
        assert_eq!(format_sensitive("user@example.com"), "us***om");
        assert_eq!(format_sensitive(""), "");
        // Multi-byte characters are masked per character, not per byte
        assert_eq!(format_sensitive("üser@ex.de"), "üs***de");
    }

    #[test]
    fn test_logging_initialization() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("logs").join("links-in.log");

        let result = initialize_logging(&log_file, LevelFilter::Info);

        // Another test may have installed the global logger first
        assert!(
            result.is_ok()
                || result
                    .unwrap_err()
                    .to_string()
                    .contains("already initialized")
        );
        assert!(log_file.exists());
    }
}
