//! Question bank loading and selection
//!
//! The bank is loaded once at startup, either from the built-in set or from a
//! JSON file, and validated before the server starts broadcasting.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors that can occur while loading the question bank
#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank contains no questions")]
    Empty,

    #[error("question {index} has {count} options, need at least 2")]
    TooFewOptions { index: usize, count: usize },

    #[error("question {index} has correct_index {correct_index} but only {count} options")]
    CorrectIndexOutOfRange {
        index: usize,
        correct_index: usize,
        count: usize,
    },
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`
    pub correct_index: usize,
}

/// Immutable pool of questions the cycle draws from
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from the given questions, rejecting invalid entries
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        for (index, question) in questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(QuestionBankError::TooFewOptions {
                    index,
                    count: question.options.len(),
                });
            }
            if question.correct_index >= question.options.len() {
                return Err(QuestionBankError::CorrectIndexOutOfRange {
                    index,
                    correct_index: question.correct_index,
                    count: question.options.len(),
                });
            }
        }

        Ok(Self { questions })
    }

    /// Load from a JSON file if a path is given, otherwise use the built-in set
    pub fn load(path: Option<&Path>) -> Result<Self, QuestionBankError> {
        match path {
            Some(path) => {
                let data = std::fs::read_to_string(path)?;
                let questions: Vec<Question> = serde_json::from_str(&data)?;
                Self::new(questions)
            }
            None => Self::new(builtin_questions()),
        }
    }

    /// Pick one question uniformly at random; the same question may repeat
    /// across consecutive picks
    pub fn pick(&self) -> &Question {
        let mut rng = rand::rng();
        &self.questions[rng.random_range(0..self.questions.len())]
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// The default question set, used when no question file is configured
fn builtin_questions() -> Vec<Question> {
    vec![
        Question {
            question: "Which is the largest planet in the solar system ?".to_string(),
            options: vec![
                "Earth".to_string(),
                "Mars".to_string(),
                "Jupiter".to_string(),
                "Saturn".to_string(),
            ],
            correct_index: 2,
        },
        Question {
            question: "What is the capital of Japan ?".to_string(),
            options: vec![
                "Osaka".to_string(),
                "Nagoya".to_string(),
                "Tokyo".to_string(),
                "Fukuoka".to_string(),
            ],
            correct_index: 2,
        },
        Question {
            question: "Where was Picasso born ?".to_string(),
            options: vec![
                "France".to_string(),
                "Spain".to_string(),
                "Italy".to_string(),
                "Portugal".to_string(),
            ],
            correct_index: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_bank_is_valid() {
        let bank = QuestionBank::load(None).unwrap();
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn test_correct_index_is_always_valid() {
        let bank = QuestionBank::load(None).unwrap();
        for _ in 0..50 {
            let question = bank.pick();
            assert!(question.correct_index < question.options.len());
        }
    }

    #[test]
    fn test_empty_bank_rejected() {
        let result = QuestionBank::new(vec![]);
        assert!(matches!(result, Err(QuestionBankError::Empty)));
    }

    #[test]
    fn test_too_few_options_rejected() {
        let result = QuestionBank::new(vec![Question {
            question: "Lonely?".to_string(),
            options: vec!["Yes".to_string()],
            correct_index: 0,
        }]);
        assert!(matches!(
            result,
            Err(QuestionBankError::TooFewOptions { index: 0, count: 1 })
        ));
    }

    #[test]
    fn test_correct_index_out_of_range_rejected() {
        let result = QuestionBank::new(vec![Question {
            question: "Which one?".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            correct_index: 2,
        }]);
        assert!(matches!(
            result,
            Err(QuestionBankError::CorrectIndexOutOfRange {
                index: 0,
                correct_index: 2,
                count: 2
            })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "What is 2+2?", "options": ["3", "4"], "correct_index": 1}}]"#
        )
        .unwrap();

        let bank = QuestionBank::load(Some(file.path())).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.pick().question, "What is 2+2?");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "Broken", "options": ["A", "B"], "correct_index": 5}}]"#
        )
        .unwrap();

        let result = QuestionBank::load(Some(file.path()));
        assert!(matches!(
            result,
            Err(QuestionBankError::CorrectIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = QuestionBank::load(Some(Path::new("/nonexistent/questions.json")));
        assert!(matches!(result, Err(QuestionBankError::Io(_))));
    }

    #[test]
    fn test_pick_returns_bank_member() {
        let bank = QuestionBank::load(None).unwrap();
        let picked = bank.pick().clone();
        assert!(builtin_questions().contains(&picked));
    }
}
