//! Terminal output for the CLI
//!
//! Every message has a colored form and a plain tagged form for `--no-color`
//! and log capture.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Writes CLI status lines, colored or plain.
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Colored output
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Plain output
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn line(&self, colored: impl Display, plain: impl Display) {
        if self.colored {
            println!("{}", colored);
        } else {
            println!("{}", plain);
        }
    }

    /// Name and version
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        self.line(
            format!("\n   {} {}\n", "satchel".bright_cyan().bold(), version.dimmed()),
            format!("\n   satchel {}\n", version),
        );
    }

    pub fn header(&self, title: &str) {
        self.line(
            format!("\n  {}", title.bright_white().bold().underline()),
            format!("\n  === {} ===", title),
        );
    }

    pub fn success(&self, message: &str) {
        self.line(
            format!("  {} {}", "✓".green().bold(), message.green()),
            format!("  [OK] {}", message),
        );
    }

    pub fn warning(&self, message: &str) {
        self.line(
            format!("  {} {}", "!".yellow().bold(), message.yellow()),
            format!("  [WARN] {}", message),
        );
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// A file or directory written by `init`.
    pub fn created(&self, kind: &str, path: &str) {
        self.line(
            format!("  {} {} {}", "+".green().bold(), kind.dimmed(), path.bright_white()),
            format!("  [CREATED] {} {}", kind, path),
        );
    }

    /// A file `init` left alone.
    pub fn skipped(&self, path: &str, reason: &str) {
        self.line(
            format!("  {} {} ({})", "-".yellow(), path.dimmed(), reason.yellow()),
            format!("  [SKIPPED] {} ({})", path, reason),
        );
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.line(
            format!("    {}: {}", key.dimmed(), value.bright_white()),
            format!("    {}: {}", key, value),
        );
    }

    pub fn hint(&self, message: &str) {
        self.line(
            format!("\n  {}", message.dimmed().italic()),
            format!("\n  [TIP] {}", message),
        );
    }

    /// A shell command the user can run next.
    pub fn command(&self, cmd: &str) {
        self.line(
            format!("     {} {}", "$".dimmed(), cmd.bright_cyan()),
            format!("     $ {}", cmd),
        );
    }

    pub fn complete(&self, message: &str) {
        self.line(
            format!("\n  {}", message.bright_green().bold()),
            format!("\n  [DONE] {}", message),
        );
    }
}
