//! Channel-prefixed terminal output.
//!
//! Every line is tagged with the channel that produced it:
//!
//! | Channel            | Emitted by                                     |
//! |--------------------|------------------------------------------------|
//! | `serve`, `replay`  | the binary's subcommands                       |
//! | `app`              | controller: fragment resolution, action kinds  |
//! | `rerun`            | rerun and halt interrupts, rerun limit         |
//! | `session`          | purges on clear and navigation                 |
//! | `form`, `dialog`   | parked form events, dialog close               |
//! | `error`            | request failures                               |
//!
//! `debug!` lines only appear with `--verbose`; `debug_do!` guards work that
//! only feeds debug lines.
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! debug!("rerun"; "#{} scope {:?}", reruns, scope);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{AnsiColors, OwoColorize};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Toggle `debug!` output, from `-v`.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// ============================================================================
// Macros
// ============================================================================

/// Print `channel`-prefixed formatted text.
#[macro_export]
macro_rules! log {
    ($channel:expr; $($arg:tt)*) => {{
        $crate::logger::log($channel, &format!($($arg)*))
    }};
}

/// Like `log!`, verbose only. Arguments are not formatted when quiet.
#[macro_export]
macro_rules! debug {
    ($channel:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($channel, &format!($($arg)*))
        }
    }};
}

/// Run a block only in verbose mode, e.g. to collect action kinds for a
/// `debug!` line.
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

#[inline]
pub fn log(channel: &str, message: &str) {
    let prefix = format!("[{channel}]");
    let prefix = prefix.color(channel_color(channel)).bold().to_string();

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn channel_color(channel: &str) -> AnsiColors {
    match channel.to_ascii_lowercase().as_str() {
        "serve" => AnsiColors::BrightBlue,
        "replay" => AnsiColors::BrightGreen,
        "error" => AnsiColors::BrightRed,
        "rerun" | "session" => AnsiColors::BrightMagenta,
        "form" | "dialog" => AnsiColors::BrightCyan,
        _ => AnsiColors::BrightYellow,
    }
}
