#![forbid(unsafe_code)]

//! Console logging for the browser host.
//!
//! A `tracing-subscriber` `fmt` layer formats each event into a line buffer;
//! complete lines go to the matching `console` method for their level
//! (`console.error` for `ERROR`, `console.warn` for `WARN`, and so on).
//! Outside wasm the lines go to stderr so the host code stays testable.

use std::io;

use ampui_core::config::ConfigError;
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::WebError;

/// `MakeWriter` that forwards formatted lines to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffer for one formatted event.
///
/// Complete lines are emitted on `flush`; a trailing partial line is emitted
/// when the writer drops.
#[derive(Debug)]
pub struct ConsoleLine {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    fn emit_complete(&mut self) {
        for line in take_lines(&mut self.buf, false) {
            emit(self.level, &line);
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_complete();
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        for line in take_lines(&mut self.buf, true) {
            emit(self.level, &line);
        }
    }
}

/// Drain newline-terminated lines from `buf`.
///
/// With `all`, a trailing unterminated line is drained too. Empty lines are
/// dropped; invalid UTF-8 is replaced.
fn take_lines(buf: &mut Vec<u8>, all: bool) -> Vec<String> {
    let cut = if all {
        buf.len()
    } else {
        match buf.iter().rposition(|&b| b == b'\n') {
            Some(idx) => idx + 1,
            None => return Vec::new(),
        }
    };
    let drained: Vec<u8> = buf.drain(..cut).collect();
    String::from_utf8_lossy(&drained)
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&value),
        Level::WARN => console::warn_1(&value),
        Level::INFO => console::info_1(&value),
        _ => console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Parse an `EnvFilter` directive string such as `"info,ampui_widgets=debug"`.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, WebError> {
    EnvFilter::try_new(directives).map_err(|err| {
        WebError::Config(ConfigError::Invalid {
            field: "log_filter",
            reason: err.to_string(),
        })
    })
}

/// Install the console subscriber as the global default.
///
/// Returns `Ok(false)` if a global subscriber was already installed (for
/// example by a second `start` on the same page).
pub fn init_logging(directives: &str) -> Result<bool, WebError> {
    let filter = parse_filter(directives)?;
    let layer = fmt::layer()
        .with_writer(ConsoleWriter)
        .without_time()
        .with_target(true);
    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok())
}
