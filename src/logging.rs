use std::io::Write;

use flexi_logger::{style, DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle};
use log::Record;

/// One-letter level prefix, colored on terminals.
pub fn log_format(w: &mut dyn Write, _now: &mut DeferredNow, record: &Record) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "{} {}",
        style(level).paint(level.to_string()[..1].to_string()),
        style(level).paint(record.args().to_string())
    )
}

/// Start logging to `logs/<app>_*.log`. With `to_stderr` every record is
/// duplicated to stderr as well; the full-screen client turns that off.
///
/// Keep the returned handle alive for as long as the program logs.
pub fn init_logger(app: &str, spec: &str, to_stderr: bool) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    let duplicate = if to_stderr { Duplicate::All } else { Duplicate::None };
    Logger::try_with_str(spec)?
        .format_for_stderr(log_format)
        .log_to_file(FileSpec::default().directory("logs").basename(app))
        .duplicate_to_stderr(duplicate)
        .start()
}
