//! # CLI Module
//!
//! Command implementations for the `flipbook` binary. Each command loads the
//! input text, drives a [`crate::state::FlipbookState`] and presents the
//! result as tables, JSON or console messages.
//!
//! ## Commands
//!
//! - [`check`] - Validates input lines locally and lists their issues
//! - [`generate`] - Resolves every valid line and prints the cards
//! - [`example`] - Prints the built-in example input
//!
//! ## Input
//!
//! Input comes from `--input FILE`, from stdin when it is piped, or from the
//! built-in example otherwise. See [`load_input`].
//!
//! ## Usage Patterns
//!
//! ```bash
//! flipbook example > cards.txt          # Start from the example
//! flipbook check --input cards.txt      # Fix lines before generating
//! flipbook generate --input cards.txt   # Print the cards
//! cat cards.txt | flipbook generate --json
//! ```

mod check;
mod generate;
mod input;

use tabled::Table;

use crate::{
    state::EXAMPLE_INPUT,
    types::{Issue, IssueTableRow},
};

pub use check::check;
pub use generate::generate;
pub use input::load_input;

pub fn example() {
    println!("{}", EXAMPLE_INPUT);
}

pub fn issue_rows(issues: &[Issue]) -> Vec<IssueTableRow> {
    issues
        .iter()
        .map(|issue| IssueTableRow {
            line: issue.line_number,
            severity: issue.severity.to_string(),
            code: issue.code.to_string(),
            message: issue.message.clone(),
            suggestion: issue.suggestion.clone().unwrap_or_default(),
        })
        .collect()
}

pub(crate) fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }

    println!("{}", Table::new(issue_rows(issues)));
}
