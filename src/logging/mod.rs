use std::{io::Write as _, time::SystemTime};

use anstyle::{AnsiColor, Effects};
use env_logger::Env;
use log::LevelFilter;

/// Maps `-v`/`-q` counts to a default level. `RUST_LOG` still wins.
pub fn level(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        2..=i16::MAX => LevelFilter::Trace,
    }
}

pub fn init(level: LevelFilter) {
    let default_filter = format!("{}={level}", env!("CARGO_CRATE_NAME"));
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    let subtle = AnsiColor::BrightBlack.on_default();
    builder.format(move |buf, record| {
        let now = SystemTime::now();
        write!(buf, "{subtle}[{subtle:#}")?;
        if let Ok(now) = jiff::Timestamp::try_from(now) {
            write!(buf, "{now:.3} ")?;
        } else {
            write!(buf, "timestamp_error ")?;
        }
        let level_style = match record.level() {
            log::Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
            log::Level::Warn => AnsiColor::Yellow.on_default(),
            log::Level::Info => AnsiColor::Green.on_default(),
            log::Level::Debug => AnsiColor::Blue.on_default(),
            log::Level::Trace => AnsiColor::Cyan.on_default(),
        };
        write!(
            buf,
            "{level_style}{}{level_style:#} {}",
            record.level(),
            record.target(),
        )?;
        if let Some(line) = record.line() {
            write!(buf, ":{line}")?;
        }
        write!(buf, "{subtle}]{subtle:#} ")?;
        writeln!(buf, "{}", record.args())
    });
    builder.init();
}
