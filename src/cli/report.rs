//! Console output of a run.
//!
//! Every line starts with a colored prefix (`Error:`, `Warning:`, `Info:`).
//! Colors are disabled by `colored` when `NO_COLOR` is set.

use std::io::{self, Write};

use colored::Colorize;

pub use crate::core::discovery::display_path;

pub fn print_error_to<W: Write>(message: &str, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} {}", "Error:".red().bold(), message)
}

pub fn print_warning_to<W: Write>(message: &str, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} {}", "Warning:".yellow().bold(), message)
}

pub fn print_info_to<W: Write>(message: &str, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} {}", "Info:".blue().bold(), message)
}

/// Print a unified diff, coloring added and removed lines.
pub fn print_diff_to<W: Write>(diff: &str, writer: &mut W) -> io::Result<()> {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            writeln!(writer, "{}", line.bold())?;
        } else if line.starts_with("@@") {
            writeln!(writer, "{}", line.cyan())?;
        } else if line.starts_with('+') {
            writeln!(writer, "{}", line.green())?;
        } else if line.starts_with('-') {
            writeln!(writer, "{}", line.red())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}

/// Final line of a run.
pub fn print_summary(message: &str) {
    println!("{} {}", "PoPie:".bold(), message);
}
