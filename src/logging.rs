use env_logger::Env;
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset. Warnings only, so a normal run writes
/// nothing to stderr.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

pub fn init() {
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LEVEL.as_str()));
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
