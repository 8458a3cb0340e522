//! Cargo-style terminal output for the spritepak CLI.
//!
//! Every status line goes to stderr as a right-aligned verb followed by a
//! message. Stdout stays free for `info --json`.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Width of the right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Colour of a status verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Green,
    Cyan,
    Yellow,
    Dim,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Green => "\x1b[32m",
            Tone::Cyan => "\x1b[36m",
            Tone::Yellow => "\x1b[33m",
            Tone::Dim => "\x1b[2m",
        }
    }
}

/// Status printer. Colour is on when stderr is a terminal; `--verbose`
/// enables the dim detail lines.
pub struct Printer {
    color: bool,
    verbose: bool,
}

impl Printer {
    pub fn new(verbose: bool) -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbose,
        }
    }

    /// Progress or completion, e.g. `     Loading body.img (ver2, 4 entities)`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Green, verb, message);
    }

    /// Container facts printed by `info`.
    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Cyan, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Yellow, verb, message);
    }

    /// Detail line, only with `--verbose`.
    pub fn verbose(&self, verb: &str, message: &str) {
        if self.verbose {
            self.emit(Tone::Dim, verb, message);
        }
    }

    /// Bold table heading.
    pub fn heading(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Display form of `path`, highlighted.
    pub fn path(&self, path: &Path) -> String {
        self.paint(Tone::Cyan.code(), &display_path(path))
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn format_line(&self, tone: Tone, verb: &str, message: &str) -> String {
        let verb = format!("{verb:>VERB_WIDTH$}");
        if self.color {
            format!("{BOLD}{}{verb}{RESET} {message}", tone.code())
        } else {
            format!("{verb} {message}")
        }
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let line = self.format_line(tone, verb, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

/// `plural(1, "entity", "entities")` is "1 entity".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { pluralized })
}

/// Path relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Printer {
        Printer {
            color: false,
            verbose: false,
        }
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "entity", "entities"), "1 entity");
        assert_eq!(plural(0, "entity", "entities"), "0 entities");
        assert_eq!(plural(5, "image", "images"), "5 images");
    }

    #[test]
    fn test_display_path() {
        let outside = Path::new("/nonexistent/path/to/body.img");
        assert_eq!(display_path(outside), "/nonexistent/path/to/body.img");

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd), ".");
        assert_eq!(display_path(&cwd.join("a.img")), "a.img");
    }

    #[test]
    fn test_plain_line_alignment() {
        let line = plain().format_line(Tone::Green, "Loading", "body.img");
        assert_eq!(line, "     Loading body.img");
    }

    #[test]
    fn test_colour_line() {
        let printer = Printer {
            color: true,
            verbose: false,
        };
        let line = printer.format_line(Tone::Yellow, "Kept", "x.txt");
        assert!(line.starts_with("\x1b[1m\x1b[33m"));
        assert!(line.ends_with("\x1b[0m x.txt"));
        assert_eq!(printer.heading("index"), "\x1b[1mindex\x1b[0m");
    }

    #[test]
    fn test_plain_paint_is_identity() {
        let printer = plain();
        assert_eq!(printer.heading("index"), "index");
        assert_eq!(printer.path(Path::new("/tmp/out")), "/tmp/out");
    }
}
