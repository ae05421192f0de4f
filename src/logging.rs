use log::LevelFilter;

/// Default level is warn so lenient-parse warnings reach the user; each `-v`
/// raises it one step. `RUST_LOG` has the last word.
pub fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();

    builder.filter(None, level_for(verbosity));

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.format_timestamp(None);
    builder.init();
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
