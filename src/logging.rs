use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Install the global logger.
///
/// Console output goes to stderr, an optional debug log goes to `log_file`,
/// and every error is appended to `error_log`.
pub fn setup_logging(
    console_level: LevelFilter,
    log_file: Option<PathBuf>,
    log_file_level: LevelFilter,
    error_log: &Path,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let errors = fern::Dispatch::new()
        .level(LevelFilter::Error)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} {} {}",
                chrono::Local::now().format("%H:%M:%S,%3f"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(
            fern::log_file(error_log)
                .wrap_err_with(|| format!("Failed to open error log: {}", error_log.display()))?,
        );

    let mut root = fern::Dispatch::new()
        .level(LevelFilter::Trace)
        .level_for("sqlx", LevelFilter::Warn)
        .level_for("sea_orm", LevelFilter::Warn)
        .level_for("tracing::span", LevelFilter::Off)
        .chain(console)
        .chain(errors);

    if let Some(log_file) = log_file {
        let file = fern::Dispatch::new()
            .level(log_file_level)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(
                fern::log_file(&log_file)
                    .wrap_err_with(|| format!("Failed to open log file: {}", log_file.display()))?,
            );
        root = root.chain(file);
    }

    root.apply().wrap_err("Failed to install logger")?;
    Ok(())
}
