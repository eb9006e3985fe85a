use colored::Colorize;
use deploykit::{Reporter, Stage};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Pipeline reporter
// ============================================================================

/// Renders pipeline progress on the terminal.
///
/// Status lines go to stdout between the streamed output of `adk`; errors
/// go to stderr. With `quiet`, only errors and the final result are shown.
pub struct TermReporter {
    quiet: bool,
}

impl TermReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for TermReporter {
    fn stage(&self, stage: Stage, msg: &str) {
        if !self.quiet {
            println!("{} {}", stage.marker(), msg.bold());
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            println!("✅ {}", msg.green());
        }
    }

    fn finished(&self, msg: &str) {
        println!();
        println!("✨ {}", msg.green().bold());
    }

    fn error(&self, msg: &str) {
        eprintln!("❌ {}", msg.red());
    }

    fn detail(&self, msg: &str) {
        for line in msg.lines() {
            eprintln!("   {}", line.dimmed());
        }
    }
}
