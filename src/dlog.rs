//! Debug logging to a local file, gated by `DOOM_DEBUG`.
//!
//! The terminal is owned by the renderer, so diagnostics cannot go to
//! stdout/stderr. When `DOOM_DEBUG=1` (or `true`) is set, the `log` facade
//! is wired to `<save dir>/debug.log`; otherwise logging stays a no-op.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{}.{:03}] {} {}: {}",
                ts.as_secs(),
                ts.subsec_millis(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub(crate) fn env_enables_debug(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

/// Install the file logger if `DOOM_DEBUG` asks for it.
pub fn init(save_dir: &Path) {
    let enabled = env::var("DOOM_DEBUG")
        .map(|v| env_enables_debug(&v))
        .unwrap_or(false);
    if !enabled {
        return;
    }

    let path = save_dir.join("debug.log");
    let Ok(file) = File::create(&path) else {
        return;
    };
    let logger = FileLogger {
        file: Mutex::new(file),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}
