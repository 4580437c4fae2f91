use super::certification::{CertificationPolicy, ScoreBand};
use super::clock::format_clock;
use super::domain::AssessmentStep;
use super::recorder::SessionResult;
use serde::Serialize;

/// Results page for a finalized session.
#[derive(Debug, Clone, Serialize)]
pub struct ResultReport {
    pub step: AssessmentStep,
    pub step_label: String,
    pub percentage: u8,
    pub band: ScoreBand,
    pub badge: String,
    pub message: &'static str,
    pub certificate_eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step_label: Option<String>,
    pub total_questions: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub time_spent: String,
    pub submitted_by: &'static str,
    pub competencies: Vec<CompetencyRow>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetencyRow {
    pub competency: String,
    pub correct: usize,
    pub total: usize,
    pub percentage: u8,
}

impl ResultReport {
    pub fn from_result(result: &SessionResult, policy: &CertificationPolicy) -> Self {
        let bands = policy.bands();
        let band = ScoreBand::from_percentage(result.score.percentage, &bands);
        let outcome = &result.outcome;

        let competencies = result
            .score
            .competencies
            .iter()
            .map(|entry| CompetencyRow {
                competency: entry.competency.clone(),
                correct: entry.correct,
                total: entry.total,
                percentage: entry.percentage(),
            })
            .collect::<Vec<_>>();

        let mut recommendations = Vec::new();
        if outcome.is_failed() {
            recommendations.push("Review fundamental digital literacy concepts".to_string());
            recommendations.push("Practice basic computer skills and internet navigation".to_string());
            recommendations.push("Note: retesting is not available for Step 1 failures".to_string());
        } else {
            recommendations.extend(
                competencies
                    .iter()
                    .filter(|row| row.percentage < bands.advancement())
                    .map(|row| format!("Strengthen {} ({}%)", row.competency, row.percentage)),
            );
            if let Some(next) = outcome.advance_to {
                recommendations.push(format!("You're eligible for the Step {} assessment", next.number()));
            }
        }

        Self {
            step: result.step,
            step_label: result.step.label(),
            percentage: result.score.percentage,
            band,
            badge: outcome.badge(),
            message: band.message(outcome),
            certificate_eligible: outcome.certificate_eligible(),
            next_step_label: outcome
                .advance_to
                .map(|next| format!("Continue to Step {}", next.number())),
            total_questions: result.score.total_questions,
            correct: result.score.correct,
            incorrect: result.score.incorrect,
            unanswered: result.score.unanswered,
            time_spent: format_clock(result.score.elapsed_seconds),
            submitted_by: result.reason.label(),
            competencies,
            recommendations,
        }
    }
}
