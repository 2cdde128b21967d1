use crate::error::{ExtractTextError, Result};
use std::io::{self, BufRead, Write};

pub const CONFIRM_QUESTION: &str = "Do you want to process all of these files? (yes/no): ";

/// `yes` or `y`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "yes" || answer == "y"
}

/// Ask on stdout and read one line from stdin. End of input counts as "no".
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout.lock(), question)
}

pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> Result<bool> {
    write!(writer, "{}", question).map_err(prompt_error)?;
    writer.flush().map_err(prompt_error)?;

    let mut answer = String::new();
    reader.read_line(&mut answer).map_err(prompt_error)?;

    Ok(is_affirmative(&answer))
}

fn prompt_error(error: io::Error) -> ExtractTextError {
    ExtractTextError::Prompt {
        message: error.to_string(),
    }
}
