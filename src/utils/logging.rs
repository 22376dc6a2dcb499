//! Logger setup shared by the binary and by anything embedding the library.
//!
//! `RUST_LOG` still wins over the level picked here, so
//! `RUST_LOG=oee_tracker_lib=trace` works as usual.

use log::LevelFilter;

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // A second init (tests, embedding callers) is harmless.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .try_init();
}
