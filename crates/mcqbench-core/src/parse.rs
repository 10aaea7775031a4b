//! Answer-letter extraction from free-text model output.
//!
//! The first uppercase `A`, `B`, `C` or `D` anywhere in the text wins. The
//! letter does not have to stand alone, so `"A)"` and `"The answer is A."`
//! both parse, at the cost of false positives on stray capitals.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::AnswerLetter;

static ANSWER_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[ABCD]").expect("static pattern compiles"));

/// Extract the answer letter, or `None` when the text contains none.
pub fn parse_answer(response: &str) -> Option<AnswerLetter> {
    ANSWER_LETTER
        .find(response)
        .and_then(|m| m.as_str().chars().next())
        .and_then(AnswerLetter::from_char)
}
