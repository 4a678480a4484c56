use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Status,
    Success,
    Info,
    Warn,
    Error,
}

impl Level {
    fn style(self) -> Style {
        let color = match self {
            Level::Status => AnsiColor::Cyan,
            Level::Success => AnsiColor::Green,
            Level::Info => AnsiColor::Blue,
            Level::Warn => AnsiColor::Yellow,
            Level::Error => AnsiColor::Red,
        };
        Style::new().bold().fg_color(Some(color.into()))
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }
}

fn color_enabled(stderr: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if stderr {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    }
}

/// Render a right-aligned label followed by the message
///
/// Continuation lines are indented under the first message line.
fn render(level: Level, label: &str, message: &str, color: bool) -> String {
    let (prefix, suffix) = if color {
        let style = level.style();
        (style.render().to_string(), style.render_reset().to_string())
    } else {
        (String::new(), String::new())
    };

    let mut out = String::new();
    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            out.push_str(&format!(
                "{prefix}{label:>width$}{suffix} {line}\n",
                width = LABEL_WIDTH
            ));
        } else {
            out.push_str(&format!("{:>width$} {line}\n", "", width = LABEL_WIDTH));
        }
    }
    out
}

fn emit(level: Level, label: &str, message: &str) {
    let stderr = level.to_stderr();
    let text = render(level, label, message, color_enabled(stderr));
    // Output errors (closed pipe etc.) are not worth failing a command over.
    let _ = if stderr {
        io::stderr().lock().write_all(text.as_bytes())
    } else {
        io::stdout().lock().write_all(text.as_bytes())
    };
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 60 {
        format!("{}m {}s", elapsed.as_secs() / 60, elapsed.as_secs() % 60)
    } else if elapsed.as_millis() >= 1000 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

pub fn status(label: &str, message: impl Display) {
    emit(Level::Status, label, &message.to_string());
}

pub fn info(message: impl Display) {
    emit(Level::Info, "Info", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    emit(Level::Success, label, &message.to_string());
}

pub fn warn(message: impl Display) {
    emit(Level::Warn, "Warning", &message.to_string());
}

pub fn error(message: impl Display) {
    emit(Level::Error, "Error", &message.to_string());
}

/// A long-running step whose completion line reports elapsed time
pub struct Progress {
    message: String,
    started: Instant,
}

impl Progress {
    pub fn start(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        emit(Level::Status, label, &message);
        Self {
            message,
            started: Instant::now(),
        }
    }

    pub fn finish(self, label: &str) {
        let elapsed = format_elapsed(self.started.elapsed());
        emit(
            Level::Success,
            label,
            &format!("{} in {elapsed}", self.message),
        );
    }

    pub fn fail(self, reason: impl Display) {
        let elapsed = format_elapsed(self.started.elapsed());
        emit(
            Level::Error,
            "Failed",
            &format!("{} after {elapsed}: {reason}", self.message),
        );
    }
}
