//! log4rs setup. Application lines go to `app.log`, query telemetry (target
//! `adoptlite::metrics`) to `metrics.log`, and developer traces (target `adoptlite::dev6`)
//! to `dev6.log` when enabled. Without a directory everything goes to stderr.

use crate::errors::DbError;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, stem: &str, keep: u32) -> Result<RollingFileAppender, DbError> {
    let pattern = format!("{}", base.join(format!("{stem}.{{}}.log")).display());
    let roller = FixedWindowRoller::builder()
        .build(&pattern, keep)
        .map_err(|e| DbError::Config(format!("log roller for {stem}: {e}")))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))
        .map_err(|e| DbError::Io(format!("log file {stem}.log: {e}")))
}

/// Builds the logging configuration without installing it.
///
/// # Errors
/// Returns an error if the log directory or its files cannot be created.
pub fn build_config(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_dev6: bool,
) -> Result<Config, DbError> {
    let lvl = parse_level(level);
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let mut builder = Config::builder();
    let root_appender;
    match dir {
        Some(base) => {
            std::fs::create_dir_all(base)?;
            builder = builder
                .appender(Appender::builder().build("app", Box::new(rolling(base, "app", keep)?)))
                .appender(Appender::builder().build("metrics", Box::new(rolling(base, "metrics", keep)?)))
                .logger(Logger::builder().appender("metrics").additive(false).build("adoptlite::metrics", lvl));
            if enable_dev6 {
                builder = builder
                    .appender(Appender::builder().build("dev6", Box::new(rolling(base, "dev6", keep)?)))
                    .logger(
                        Logger::builder()
                            .appender("dev6")
                            .additive(false)
                            .build("adoptlite::dev6", LevelFilter::Trace),
                    );
            }
            root_appender = "app";
        }
        None => {
            let console = ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(PATTERN)))
                .build();
            builder = builder.appender(Appender::builder().build("console", Box::new(console)));
            let dev6_level = if enable_dev6 { LevelFilter::Trace } else { LevelFilter::Off };
            builder = builder.logger(Logger::builder().build("adoptlite::dev6", dev6_level));
            root_appender = "console";
        }
    }
    if dir.is_some() && !enable_dev6 {
        builder = builder.logger(Logger::builder().additive(false).build("adoptlite::dev6", LevelFilter::Off));
    }
    builder
        .build(Root::builder().appender(root_appender).build(lvl))
        .map_err(|e| DbError::Config(format!("log config: {e}")))
}

/// Configure logging globally for the process.
/// - dir: base directory for log files; if None, log to stderr.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if the configuration cannot be built or a logger is already installed.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_dev6: bool,
) -> Result<(), DbError> {
    let config = build_config(dir, level, retention, enable_dev6)?;
    log4rs::init_config(config).map_err(|e| DbError::Config(format!("logger already set: {e}")))?;
    Ok(())
}
