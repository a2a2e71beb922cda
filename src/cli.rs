//! Terminal front-ends for the two views.
//!
//! Each view reads one command per line, hands it to its controller and then
//! renders whatever the controller changed plus any queued toasts.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::toast::{Toaster, Variant};

pub mod student;
pub mod teacher;

#[derive(Parser, Debug)]
#[command(author, version, about = "College project submission portal", long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: std::path::PathBuf,

    /// Backend base URL, overriding the configuration
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub view: View,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Fill in and submit project documents
    Student,
    /// Browse and download submissions
    Teacher,
}

/// Reads the next non-empty line, or `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>> {
    loop {
        write!(output, "{label}> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(Some(line.to_owned()));
        }
    }
}

/// Prints every toast not shown yet, then lets shown ones age out.
fn flush_toasts<W: Write>(toaster: &mut Toaster, output: &mut W) -> io::Result<()> {
    let pending = toaster.take_unseen();
    toaster.expire(Utc::now());
    for toast in pending {
        let marker = match toast.variant {
            Variant::Default => "*",
            Variant::Success => "+",
            Variant::Warning => "!",
            Variant::Error | Variant::Destructive => "x",
        };
        match toast.description {
            Some(description) => writeln!(output, "[{marker}] {}: {description}", toast.title)?,
            None => writeln!(output, "[{marker}] {}", toast.title)?,
        }
    }
    Ok(())
}

/// Splits `line` into its first `n` words and the remaining text.
fn split_words(line: &str, n: usize) -> (Vec<&str>, &str) {
    let mut words = Vec::with_capacity(n);
    let mut rest = line.trim_start();

    while words.len() < n && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        words.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    (words, rest)
}

/// Parses a 1-based position as shown to the user into a 0-based index.
fn position(word: &str) -> Result<usize, crate::error::PortalError> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(crate::error::PortalError::InvalidInput(format!(
            "'{word}' is not a valid position"
        ))),
    }
}
