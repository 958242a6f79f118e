//! Logging setup on top of flexi_logger
//!
//! The library only uses the `log` facade; the binary calls `init_logging`
//! once at startup.

static LOGGER_HANDLE: std::sync::OnceLock<std::sync::Mutex<flexi_logger::LoggerHandle>> =
    std::sync::OnceLock::new();

/// Start the global logger
///
/// * `log_level` - flexi_logger spec such as `info` or `multiqueue=debug`
/// * `log_format` - `text` (default), `ext` (adds source location) or `json`
/// * `log_file` - write to this file instead of stderr
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let level_str = log_level.unwrap_or("info");
    let mut logger = Logger::try_with_str(level_str)?;

    logger = match (log_format.unwrap_or("text"), color_enabled) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(std::sync::Mutex::new(handle));

    Ok(())
}

/// Change the log level of a running logger
///
/// Format and destination are fixed once flexi_logger has started.
pub fn set_log_level(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle_mutex = LOGGER_HANDLE
        .get()
        .ok_or("Logger handle not initialised. Call init_logging first.")?;
    let mut handle = handle_mutex
        .lock()
        .map_err(|_| "Could not acquire logger handle lock")?;
    handle.parse_and_push_temp_spec(level_str_or_default(log_level))?;
    Ok(())
}

fn level_str_or_default(level: &str) -> &str {
    if level.trim().is_empty() {
        "info"
    } else {
        level
    }
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => level_abbr(level).red().bold(),
        log::Level::Warn => level_abbr(level).yellow(),
        log::Level::Info => level_abbr(level).green(),
        log::Level::Debug => level_abbr(level).blue(),
        log::Level::Trace => level_abbr(level).magenta(),
    }
}

// "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

// "YYYY-MM-DD HH:mm:ss.fff INF message (queue/multi_queue.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use serde_json::{json, to_string};

    let json_obj = json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line())
    });

    match to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// multiqueue::queue::lane -> queue/lane.rs:LINE
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("multiqueue::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn render(
        format: fn(
            &mut dyn std::io::Write,
            &mut flexi_logger::DeferredNow,
            &log::Record,
        ) -> Result<(), std::io::Error>,
    ) -> String {
        let mut out = Vec::new();
        let mut now = flexi_logger::DeferredNow::new();
        format(
            &mut out,
            &mut now,
            &log::Record::builder()
                .args(format_args!("queue 'decoder' closing"))
                .level(log::Level::Warn)
                .target("multiqueue::queue::multi_queue")
                .line(Some(42))
                .build(),
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_target_as_path() {
        assert_eq!(
            format_target_as_path("multiqueue::queue::lane", Some(7)),
            "queue/lane.rs:7"
        );
        assert_eq!(format_target_as_path("tokio::runtime", None), "tokio/runtime");
    }

    #[test]
    fn test_plain_formats() {
        let simple = render(simple_format);
        assert!(simple.ends_with("WRN queue 'decoder' closing"), "{}", simple);

        let extended = render(extended_format);
        assert!(extended.ends_with("(queue/multi_queue.rs:42)"), "{}", extended);
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let line = render(json_format);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WRN");
        assert_eq!(value["message"], "queue 'decoder' closing");
        assert_eq!(value["target"], "queue/multi_queue.rs:42");
    }

    #[test]
    #[serial]
    fn test_init_then_set_level() {
        // Only one global logger per process; a second init reports an error
        if init_logging(Some("info"), Some("ext"), None, false).is_ok() {
            assert!(set_log_level("debug").is_ok());
            log::debug!("debug level active");
        }
        assert!(init_logging(Some("info"), None, None, false).is_err());
    }
}
