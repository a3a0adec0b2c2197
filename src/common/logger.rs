use backtrace::Backtrace;
use failure::Error;
use log::{Level, LevelFilter};

use crate::common::dirs::log_file_path;

type Result<I> = std::result::Result<I, Error>;

/// Routes `log` records into `~/.dframe/log/<name>.log`. `level` overrides
/// the build-dependent default.
pub fn install_logger(name: &str, level: Option<LevelFilter>) -> Result<()> {
    let level = level.unwrap_or(if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });

    fern::Dispatch::new()
        .format(|out, message, record| {
            let (location, text) = level_colors(record.level());
            out.finish(format_args!(
                "{}[{}:{}] {}{}\x1b[0m",
                location,
                record.file().unwrap_or_else(|| record.target()),
                record.line().unwrap_or(0),
                text,
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(log_file_path(name)?)?)
        .apply()?;

    std::panic::set_hook(Box::new(|info| {
        error!("{}", info);
        for line in backtrace_lines(&Backtrace::new()) {
            error!("{}", line);
        }
    }));

    Ok(())
}

/// Parses a level name such as `debug` or `WARN`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Escape sequences for the location and the message of a record.
fn level_colors(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::Error => ("\x1b[1;31m", "\x1b[1;31m"),
        Level::Warn => ("\x1b[1;33m", "\x1b[1;33m"),
        _ => ("\x1b[34m", "\x1b[0m"),
    }
}

fn is_toolchain_source(filename: &str) -> bool {
    filename.contains("/.rustup/") || filename.contains("/.cargo/") || filename.starts_with("/rustc/")
}

/// One `#n file:line, col c` line per frame symbol outside the toolchain
/// and dependency sources.
fn backtrace_lines(backtrace: &Backtrace) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, frame) in backtrace.frames().iter().enumerate() {
        for symbol in frame.symbols() {
            let filename = match symbol.filename() {
                Some(path) => path.to_string_lossy(),
                None => continue,
            };

            if is_toolchain_source(&filename) {
                continue;
            }

            lines.push(format!(
                "    #{} {}:{}, col {}",
                i,
                filename,
                symbol.lineno().unwrap_or(0),
                symbol.colno().unwrap_or(0)
            ));
        }
    }

    lines
}
