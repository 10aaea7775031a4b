//! Per-question results and per-trial statistics.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::question::AnswerOption;

/// An answer label. Letters are assigned to options by position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    /// All labels in order.
    pub const ALL: [AnswerLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based option position this letter refers to.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// What the model was scored as answering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChosenAnswer {
    /// A letter that maps onto one of the offered options.
    Letter(AnswerLetter),
    /// No usable letter in the response.
    Invalid,
    /// The invocation itself failed.
    Error,
}

impl fmt::Display for ChosenAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => write!(f, "{}", letter),
            Self::Invalid => f.write_str("INVALID"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// Outcome of asking one question once.
///
/// Created during a trial and folded into [`RunStats`] right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    pub question_title: String,
    pub chosen: ChosenAnswer,
    /// Option text for a letter answer, raw output for `INVALID`, error
    /// description for `ERROR`.
    pub chosen_text: String,
    pub correct: bool,
}

impl TrialResult {
    pub fn answered(question_title: &str, letter: AnswerLetter, option: &AnswerOption) -> Self {
        Self {
            question_title: question_title.to_string(),
            chosen: ChosenAnswer::Letter(letter),
            chosen_text: option.text.clone(),
            correct: option.correct,
        }
    }

    pub fn invalid(question_title: &str, raw_response: &str) -> Self {
        Self {
            question_title: question_title.to_string(),
            chosen: ChosenAnswer::Invalid,
            chosen_text: raw_response.to_string(),
            correct: false,
        }
    }

    pub fn error(question_title: &str, error: &dyn fmt::Display) -> Self {
        Self {
            question_title: question_title.to_string(),
            chosen: ChosenAnswer::Error,
            chosen_text: format!("Error: {}", error),
            correct: false,
        }
    }

    /// `<letter|INVALID|ERROR> - "<text>"`, as listed for failures.
    pub fn answer_label(&self) -> String {
        format!("{} - \"{}\"", self.chosen, self.chosen_text)
    }
}

/// A failed question as kept in [`RunStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedAnswer {
    pub question: String,
    pub answer: String,
}

/// Statistics of one trial (model × system prompt × run).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunStats {
    pub model_name: String,
    /// `None` renders as `N/A`.
    pub model_temperature: Option<f64>,
    pub system_prompt_name: String,
    /// 1-based repetition index.
    pub run_number: u32,
    pub total_questions: usize,
    pub correct_count: usize,
    pub failed_count: usize,
    pub duration_ms: u64,
    /// Failed questions in the order they were asked.
    pub failed: Vec<FailedAnswer>,
}

impl RunStats {
    /// Fold a trial's results into statistics. The results are consumed.
    pub fn from_results(
        model_name: &str,
        model_temperature: Option<f64>,
        system_prompt_name: &str,
        run_number: u32,
        results: Vec<TrialResult>,
        elapsed: Duration,
    ) -> Self {
        let total_questions = results.len();
        let correct_count = results.iter().filter(|r| r.correct).count();
        let failed: Vec<FailedAnswer> = results
            .into_iter()
            .filter(|r| !r.correct)
            .map(|r| FailedAnswer {
                answer: r.answer_label(),
                question: r.question_title,
            })
            .collect();

        Self {
            model_name: model_name.to_string(),
            model_temperature,
            system_prompt_name: system_prompt_name.to_string(),
            run_number,
            total_questions,
            correct_count,
            failed_count: failed.len(),
            duration_ms: elapsed.as_millis() as u64,
            failed,
        }
    }

    /// Accuracy in percent (0.0–100.0).
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.total_questions as f64 * 100.0
    }

    /// Accuracy with one decimal, e.g. `33.3%`.
    pub fn accuracy(&self) -> String {
        format!("{}%", one_decimal(self.accuracy_percent()))
    }

    /// Wall-clock duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Duration with one decimal, e.g. `12.3sec`.
    pub fn duration(&self) -> String {
        format!("{}sec", one_decimal(self.duration_secs()))
    }

    pub fn temperature_label(&self) -> String {
        super::config::temperature_label(self.model_temperature)
    }
}

/// Render with one decimal, rounding exact halves up.
///
/// `{:.1}` resolves an exact binary tie (1.25, 0.75, ...) to the even
/// digit; reports use half-up so 1.25 renders as `1.3`. Only multiples of
/// 0.25 with an odd quarter count can be exact ties.
fn one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(results: Vec<TrialResult>) -> RunStats {
        RunStats::from_results(
            "gpt-4.1",
            None,
            "plain",
            1,
            results,
            Duration::from_millis(1_500),
        )
    }

    #[test]
    fn letters_map_to_positions() {
        for (i, letter) in AnswerLetter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), i);
            assert_eq!(AnswerLetter::from_index(i), Some(*letter));
            assert_eq!(AnswerLetter::from_char(letter.as_char()), Some(*letter));
        }
        assert_eq!(AnswerLetter::from_index(4), None);
        assert_eq!(AnswerLetter::from_char('a'), None);
    }

    #[test]
    fn chosen_answer_display() {
        assert_eq!(ChosenAnswer::Letter(AnswerLetter::C).to_string(), "C");
        assert_eq!(ChosenAnswer::Invalid.to_string(), "INVALID");
        assert_eq!(ChosenAnswer::Error.to_string(), "ERROR");
    }

    #[test]
    fn accuracy_one_of_three() {
        let option_ok = AnswerOption::new("y", true);
        let option_bad = AnswerOption::new("x", false);
        let stats = stats_with(vec![
            TrialResult::answered("q1", AnswerLetter::A, &option_ok),
            TrialResult::answered("q2", AnswerLetter::B, &option_bad),
            TrialResult::invalid("q3", "unclear"),
        ]);
        assert_eq!(stats.correct_count, 1);
        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.failed_count, 2);
        assert_eq!(stats.accuracy(), "33.3%");
    }

    #[test]
    fn failures_keep_distinct_kinds_and_order() {
        let stats = stats_with(vec![
            TrialResult::invalid("q1", "no idea"),
            TrialResult::error("q2", &"connection reset"),
        ]);
        assert_eq!(stats.failed[0].question, "q1");
        assert_eq!(stats.failed[0].answer, "INVALID - \"no idea\"");
        assert_eq!(stats.failed[1].question, "q2");
        assert_eq!(stats.failed[1].answer, "ERROR - \"Error: connection reset\"");
    }

    #[test]
    fn duration_rendered_with_one_decimal() {
        let stats = stats_with(vec![]);
        assert_eq!(stats.duration(), "1.5sec");
        assert_eq!(stats.duration_ms, 1_500);
    }

    #[test]
    fn exact_halves_round_up() {
        let mut stats = stats_with(vec![]);
        stats.duration_ms = 1_250;
        assert_eq!(stats.duration(), "1.3sec");
        stats.duration_ms = 2_750;
        assert_eq!(stats.duration(), "2.8sec");
        stats.duration_ms = 1_249;
        assert_eq!(stats.duration(), "1.2sec");

        stats.total_questions = 400;
        stats.correct_count = 1;
        assert_eq!(stats.accuracy(), "0.3%");
    }

    #[test]
    fn non_tie_values_keep_nearest_rounding() {
        assert_eq!(one_decimal(0.0), "0.0");
        assert_eq!(one_decimal(100.0), "100.0");
        assert_eq!(one_decimal(66.66666666666667), "66.7");
        assert_eq!(one_decimal(0.5), "0.5");
        assert_eq!(one_decimal(12.3), "12.3");
    }

    #[test]
    fn empty_trial_has_zero_accuracy() {
        let stats = stats_with(vec![]);
        assert_eq!(stats.accuracy(), "0.0%");
        assert_eq!(stats.temperature_label(), "N/A");
    }
}
