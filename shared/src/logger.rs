use std::io::Write;

use colored::Colorize;
use log::Level;

/// Installs the process-wide logger. Safe to call more than once,
/// only the first call wins (tests init it from several places).
pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let level = match record.level() {
            Level::Error => "ERROR".red(),
            Level::Warn => "WARN ".yellow(),
            Level::Info => "INFO ".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".magenta(),
        };
        writeln!(
            buf,
            "[{} {} {}] {}",
            timestamp,
            level,
            record.target(),
            record.args()
        )
    });

    _ = builder.try_init();
}
