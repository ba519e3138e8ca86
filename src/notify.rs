//! User-facing notices, injected into the store instead of a global toast.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        })
    }
}

pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Sends notices to the log only.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!(notice = message),
            NoticeLevel::Warning => tracing::warn!(notice = message),
            NoticeLevel::Error => tracing::error!(notice = message),
        }
    }
}

/// Prints notices on the console and logs them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        LogNotifier.notify(level, message);
        match level {
            NoticeLevel::Info => println!("{message}"),
            _ => println!("[{level}] {message}"),
        }
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;
