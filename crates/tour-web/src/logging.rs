#![forbid(unsafe_code)]

//! Browser console logging.
//!
//! [`init`] installs a `tracing-subscriber` fmt layer whose writer forwards
//! each formatted event to the `console` method matching its level. Panics
//! are reported through `console.error`.

use std::io;
use std::sync::Once;

use js_sys::Reflect;
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::{JsCast, JsValue};

/// Filter used when the host passes no directive or an invalid one.
pub const DEFAULT_DIRECTIVE: &str = "info";

fn console_call(method: &str, msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(func) = Reflect::get(&console, &method.into()) else {
        return;
    };
    let Ok(func) = func.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = func.call1(&console, &JsValue::from_str(msg));
}

fn console_method(level: Level) -> &'static str {
    match level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG | Level::TRACE => "debug",
    }
}

pub(crate) fn console_error(msg: &str) {
    console_call("error", msg);
}

/// Forward panics to `console.error`. Safe to call more than once.
pub fn install_panic_hook() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// Buffers one formatted event and flushes it to the console on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end();
        if !text.is_empty() {
            console_call(console_method(self.level), text);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber and panic hook.
///
/// `directive` uses `EnvFilter` syntax, e.g. `"info,tour_widgets=debug"`.
/// Only the first call installs a subscriber.
pub fn init(directive: &str) {
    install_panic_hook();

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
            console_call(
                "warn",
                &format!("invalid log directive {directive:?}: {err}; using {DEFAULT_DIRECTIVE:?}"),
            );
            EnvFilter::new(DEFAULT_DIRECTIVE)
        });
        let layer = tracing_subscriber::fmt::layer()
            .without_time()
            .with_ansi(false)
            .with_writer(ConsoleMakeWriter);
        if tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .is_err()
        {
            console_call("warn", "a global tracing subscriber is already installed");
        }
    });
}
