//! Question bank entities.

use serde::{Deserialize, Serialize};

use super::error::{HarnessError, Result};

/// Highest number of options a question may offer (letters A–D).
pub const MAX_OPTIONS: usize = 4;

/// One answer option of a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    /// Option text shown to the model.
    #[serde(rename = "option")]
    pub text: String,

    /// Whether this option is the correct answer.
    pub correct: bool,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// Question text.
    pub title: String,

    /// Options in their canonical (file) order.
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(title: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            title: title.into(),
            options,
        }
    }

    /// Check the well-formedness rules: 1 to 4 options, exactly one correct.
    ///
    /// `index` is the question's position in its bank and is only used for
    /// the error message.
    pub fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| HarnessError::InvalidQuestion {
            index,
            title: self.title.clone(),
            reason,
        };

        if self.options.is_empty() {
            return Err(invalid("has no options".to_string()));
        }
        if self.options.len() > MAX_OPTIONS {
            return Err(invalid(format!(
                "has {} options, at most {} are supported",
                self.options.len(),
                MAX_OPTIONS
            )));
        }

        match self.options.iter().filter(|o| o.correct).count() {
            1 => Ok(()),
            0 => Err(invalid("no option marked correct".to_string())),
            n => Err(invalid(format!("{} options marked correct", n))),
        }
    }
}

/// A loaded, validated question bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionBank {
    /// Test-set identifier the bank was loaded for (e.g. `en`).
    pub test_set: String,

    /// SHA-256 hex digest of the bank's source bytes.
    pub digest: String,

    /// Questions in file order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already-parsed questions, validating each one.
    pub fn new(
        test_set: impl Into<String>,
        digest: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self> {
        let test_set = test_set.into();
        if questions.is_empty() {
            return Err(HarnessError::InvalidConfig(format!(
                "question bank '{}' contains no questions",
                test_set
            )));
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self {
            test_set,
            digest: digest.into(),
            questions,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
