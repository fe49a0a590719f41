//! Command implementations.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod preferences;

use std::io::{self, BufRead, Write};

use movenpick_storefront::error::AppError;
use secrecy::SecretString;

/// Print a line of command output.
#[allow(clippy::print_stdout)]
pub fn output(text: impl std::fmt::Display) {
    println!("{text}");
}

/// Ask a yes/no question on stderr and read the answer from `input`.
///
/// Anything but `y`/`yes` counts as no, including end of input.
pub fn confirm_with(input: &mut impl BufRead, prompt: &str) -> bool {
    let mut err = io::stderr();
    let _ = write!(err, "{prompt} [y/N] ");
    let _ = err.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// [`confirm_with`] on standard input.
pub fn confirm(prompt: &str) -> bool {
    confirm_with(&mut io::stdin().lock(), prompt)
}

/// Read one secret line from `input`, prompting on stderr.
///
/// # Errors
///
/// Returns an error if input is closed or unreadable.
pub fn secret_with(input: &mut impl BufRead, prompt: &str) -> Result<SecretString, AppError> {
    let mut err = io::stderr();
    let _ = write!(err, "{prompt}: ");
    let _ = err.flush();

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| AppError::Internal(format!("failed to read {prompt}: {e}")))?;
    if read == 0 {
        return Err(AppError::BadRequest(format!("{prompt} is required")));
    }
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// [`secret_with`] on standard input.
///
/// # Errors
///
/// Returns an error if input is closed or unreadable.
pub fn secret(prompt: &str) -> Result<SecretString, AppError> {
    secret_with(&mut io::stdin().lock(), prompt)
}

/// Convert a one-based row number to an index.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for row 0.
pub fn row_index(row: usize) -> Result<usize, AppError> {
    row.checked_sub(1)
        .ok_or_else(|| AppError::BadRequest("Rows are numbered from 1".to_string()))
}
