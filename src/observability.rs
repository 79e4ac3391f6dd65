//! Opt-in diagnostic logging.
//!
//! The library itself only talks to the `log` facade. Applications that want
//! to see the decisions made inside chronocol (slice fast paths, freq resets,
//! dispatch fall-through) call [`enable_verbose_logging`] once.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

use crate::error::Result;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `Debug` level, writing `[LEVEL] message` lines
/// to stderr or, if given, appending to `log_file`. Subsequent calls are no-ops.
pub fn enable_verbose_logging(log_file: Option<&str>) -> Result<()> {
    // Open the file up front so a bad path is reported instead of swallowed.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Debug);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
