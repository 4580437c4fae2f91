use super::bank::QuestionBank;
use super::ledger::AnswerLedger;
use serde::{Deserialize, Serialize};

/// Outcome of grading one submitted ledger against its bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total_questions: usize,
    pub correct: usize,
    /// Wrong answers plus unanswered questions.
    pub incorrect: usize,
    pub unanswered: usize,
    pub percentage: u8,
    pub elapsed_seconds: u32,
    pub competencies: Vec<CompetencyScore>,
}

impl ScoreResult {
    pub fn answered(&self) -> usize {
        self.total_questions - self.unanswered
    }
}

/// Per-competency tally, in the order competencies first appear in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub competency: String,
    pub correct: usize,
    pub total: usize,
}

impl CompetencyScore {
    pub fn percentage(&self) -> u8 {
        round_percentage(self.correct, self.total)
    }
}

/// Grades ledgers. Unanswered questions count as incorrect and the
/// denominator is always the full bank, so partial attempts are not prorated.
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn score(bank: &QuestionBank, ledger: &AnswerLedger, elapsed_seconds: u32) -> ScoreResult {
        let mut correct = 0;
        let mut unanswered = 0;
        let mut competencies: Vec<CompetencyScore> = Vec::new();

        for question in bank.questions() {
            let is_correct = match ledger.answer_for(question.id) {
                Some(selected) => question.is_correct(selected),
                None => {
                    unanswered += 1;
                    false
                }
            };
            if is_correct {
                correct += 1;
            }

            let index = match competencies
                .iter()
                .position(|entry| entry.competency == question.competency)
            {
                Some(index) => index,
                None => {
                    competencies.push(CompetencyScore {
                        competency: question.competency.clone(),
                        correct: 0,
                        total: 0,
                    });
                    competencies.len() - 1
                }
            };
            let entry = &mut competencies[index];
            entry.total += 1;
            if is_correct {
                entry.correct += 1;
            }
        }

        let total_questions = bank.len();

        ScoreResult {
            total_questions,
            correct,
            incorrect: total_questions - correct,
            unanswered,
            percentage: round_percentage(correct, total_questions),
            elapsed_seconds,
            competencies,
        }
    }
}

/// `round(100 * part / whole)` with halves rounded up.
pub(crate) fn round_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (200 * part + whole) / (2 * whole);
    rounded.min(100) as u8
}
