use log::{Level, LevelFilter, Metadata, Record};

/// Logger backend for the simulator binaries.
///
/// Stdout belongs to the simulation timeline, which must stay
/// byte-identical across runs, so every diagnostic record goes to
/// stderr instead.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    // stderr is unbuffered; nothing to flush.
    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr backend behind the `log` facade.
///
/// Safe to call more than once; only the first call installs the
/// backend, later calls are no-ops.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
