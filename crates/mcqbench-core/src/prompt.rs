//! User prompt rendering.

use crate::domain::{AnswerLetter, AnswerOption, HarnessError, Result, MAX_OPTIONS};

/// Render the question title followed by one `<letter> - <text>` line per
/// option, in the order given. Callers shuffle the options beforehand.
///
/// Fails with [`HarnessError::TooManyOptions`] for more than four options.
pub fn build_prompt(title: &str, options: &[AnswerOption]) -> Result<String> {
    if options.len() > MAX_OPTIONS {
        return Err(HarnessError::TooManyOptions {
            count: options.len(),
        });
    }

    let mut prompt = String::from(title);
    for (letter, option) in AnswerLetter::ALL.iter().zip(options) {
        prompt.push('\n');
        prompt.push_str(&format!("{} - {}", letter, option.text));
    }

    Ok(prompt.trim().to_string())
}
