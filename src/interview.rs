// src/interview.rs
//! Mock-interview models and the in-progress session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interview difficulty selected on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Opening,
    Technical,
    Behavioral,
    Closing,
}

/// One generated interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
}

/// Assessment returned once all answers are in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFeedback {
    /// 0..=100.
    pub fluency: u8,
    pub confidence: String,
    pub technical_rating: String,
    pub general_advice: String,
}

/// One mock interview in progress: a fixed question list, answers collected
/// one at a time, and the transcript handed to scoring when finished.
#[derive(Debug)]
pub struct InterviewSession {
    job_title: String,
    difficulty: Difficulty,
    questions: Vec<InterviewQuestion>,
    answers: Vec<String>,
    current: usize,
}

impl InterviewSession {
    pub fn new(
        job_title: impl Into<String>,
        difficulty: Difficulty,
        questions: Vec<InterviewQuestion>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            difficulty,
            questions,
            answers: Vec::new(),
            current: 0,
        }
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.current)
    }

    /// (1-based position, total), for the "question N of M" header.
    pub fn progress(&self) -> (usize, usize) {
        (
            (self.current + 1).min(self.questions.len()),
            self.questions.len(),
        )
    }

    /// Record an answer for the current question and move on. Returns false
    /// once the interview is already finished.
    pub fn record_answer(&mut self, answer: impl Into<String>) -> bool {
        if self.is_finished() {
            return false;
        }
        self.answers.push(answer.into());
        self.current += 1;
        true
    }

    /// Skip the current question without recording an answer.
    pub fn skip(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// The transcript handed to scoring.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }
}
