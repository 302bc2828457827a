//! Terminal output formatting.
//!
//! Status lines go to stderr so that data printed with [`OutputHandler::json`]
//! can be piped.

pub mod colors;
pub mod errors;

use serde_json::Value;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a line of data to stdout
    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a JSON document to stdout
    pub fn json(&self, value: &Value) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", value),
        }
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
