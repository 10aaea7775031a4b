//! Loading `config.json` and `questions-<set>.json` from disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{HarnessConfig, HarnessError, Question, QuestionBank, Result};

const BANK_PREFIX: &str = "questions-";
const BANK_SUFFIX: &str = ".json";

/// Read, parse and validate a harness configuration.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: HarnessConfig =
        serde_json::from_str(&raw).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    debug!(
        path = ?path,
        models = config.models.len(),
        prompts = config.system_prompts.len(),
        "Loaded config"
    );
    Ok(config)
}

/// Location of a test set's question bank inside `dir`.
pub fn question_bank_path(dir: &Path, test_set: &str) -> PathBuf {
    dir.join(format!("{}{}{}", BANK_PREFIX, test_set, BANK_SUFFIX))
}

/// Test-set identifiers with a question bank in `dir`, sorted.
pub fn available_test_sets(dir: &Path) -> Result<Vec<String>> {
    let mut sets = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(set) = name
            .strip_prefix(BANK_PREFIX)
            .and_then(|rest| rest.strip_suffix(BANK_SUFFIX))
        {
            if !set.is_empty() {
                sets.push(set.to_string());
            }
        }
    }
    sets.sort();
    Ok(sets)
}

/// Load and validate the question bank for `test_set` from `dir`.
///
/// A missing bank is an [`HarnessError::UnknownTestSet`] listing the test
/// sets that do exist.
pub fn load_question_bank(dir: &Path, test_set: &str) -> Result<QuestionBank> {
    let path = question_bank_path(dir, test_set);
    if !path.is_file() {
        let available = available_test_sets(dir).unwrap_or_default();
        return Err(HarnessError::UnknownTestSet {
            test_set: test_set.to_string(),
            available,
        });
    }

    let bytes = std::fs::read(&path).map_err(|source| HarnessError::QuestionBankRead {
        path: path.clone(),
        source,
    })?;
    let questions: Vec<Question> =
        serde_json::from_slice(&bytes).map_err(|source| HarnessError::QuestionBankParse {
            path: path.clone(),
            source,
        })?;

    let digest = hex::encode(Sha256::digest(&bytes));
    let bank = QuestionBank::new(test_set, digest, questions)?;
    debug!(
        path = ?path,
        questions = bank.len(),
        digest = %bank.digest,
        "Loaded question bank"
    );
    Ok(bank)
}
