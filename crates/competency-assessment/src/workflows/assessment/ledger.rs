use super::domain::QuestionId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Selected option per question plus the candidate's review flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerLedger {
    answers: BTreeMap<QuestionId, usize>,
    flagged: BTreeSet<QuestionId>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or overwrites the selection. Option indices are not range
    /// checked here; banks may carry varying option counts.
    pub fn set_answer(&mut self, question_id: QuestionId, option_index: usize) {
        self.answers.insert(question_id, option_index);
    }

    /// Flips the flag and returns whether the question is now flagged.
    pub fn toggle_flag(&mut self, question_id: QuestionId) -> bool {
        if self.flagged.remove(&question_id) {
            false
        } else {
            self.flagged.insert(question_id);
            true
        }
    }

    pub fn answer_for(&self, question_id: QuestionId) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn is_flagged(&self, question_id: QuestionId) -> bool {
        self.flagged.contains(&question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn flagged_ids(&self) -> &BTreeSet<QuestionId> {
        &self.flagged
    }

    pub fn answers(&self) -> impl Iterator<Item = (QuestionId, usize)> + '_ {
        self.answers.iter().map(|(id, option)| (*id, *option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwriting_an_answer_keeps_one_entry() {
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(QuestionId(3), 1);
        ledger.set_answer(QuestionId(3), 1);
        assert_eq!(ledger.answered_count(), 1);

        ledger.set_answer(QuestionId(3), 2);
        assert_eq!(ledger.answer_for(QuestionId(3)), Some(2));
        assert_eq!(ledger.answer_for(QuestionId(4)), None);
    }

    #[test]
    fn toggling_a_flag_twice_clears_it() {
        let mut ledger = AnswerLedger::new();
        assert!(ledger.toggle_flag(QuestionId(1)));
        assert!(ledger.is_flagged(QuestionId(1)));
        assert!(!ledger.toggle_flag(QuestionId(1)));
        assert!(ledger.flagged_ids().is_empty());
    }

    #[test]
    fn accepts_indices_beyond_four_options() {
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(QuestionId(9), 7);
        assert_eq!(ledger.answer_for(QuestionId(9)), Some(7));
    }
}
