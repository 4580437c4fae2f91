use crate::infra::{bank_source, parse_percentage, parse_step, InMemoryResultRecorder};
use clap::Args;
use competency_assessment::config::AppConfig;
use competency_assessment::error::AppError;
use competency_assessment::workflows::assessment::{
    format_clock, AssessmentService, AssessmentStep, BuiltinCatalog, CertificationPolicy,
    ContentError, QuestionBankProvider, ResultReport, ScoreBand, SessionResult, SessionTick,
    SubmitReason, TestSession,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print both scenarios as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PolicyArgs {
    /// Assessment step (1, 2 or 3)
    #[arg(long, value_parser = parse_step)]
    pub(crate) step: AssessmentStep,
    /// Score percentage between 0 and 100
    #[arg(long, value_parser = parse_percentage)]
    pub(crate) score: u8,
    /// Print the decision as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BankArgs {
    /// Assessment step (1, 2 or 3)
    #[arg(long, value_parser = parse_step)]
    pub(crate) step: AssessmentStep,
    /// CSV export to read instead of the configured bank
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ScenarioOutput<'a> {
    scenario: &'static str,
    result: &'a SessionResult,
    report: ResultReport,
}

const MANUAL_ELAPSED_SECONDS: u32 = 245;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = Arc::new(BuiltinCatalog::standard().map_err(ContentError::from)?);
    let recorder = Arc::new(InMemoryResultRecorder::default());
    let service = AssessmentService::new(catalog, Arc::clone(&recorder));

    let manual = manual_submit_scenario(service.open_session(AssessmentStep::Two)?)?;
    let timeout = timeout_scenario(service.open_session(AssessmentStep::One)?)?;

    let policy = service.policy();
    if args.json {
        let outputs = [
            ScenarioOutput {
                scenario: "manual_submit",
                result: &manual,
                report: ResultReport::from_result(&manual, policy),
            },
            ScenarioOutput {
                scenario: "timeout",
                result: &timeout,
                report: ResultReport::from_result(&timeout, policy),
            },
        ];
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    println!("Competency assessment demo");
    println!("\nScenario 1: manual submit (7 correct, 2 wrong, 1 skipped)");
    render_report(&ResultReport::from_result(&manual, policy));
    println!("\nScenario 2: time runs out after 3 correct answers");
    render_report(&ResultReport::from_result(&timeout, policy));
    println!("\nResults recorded: {}", recorder.results().len());

    Ok(())
}

/// Seven correct, two wrong, the last one flagged and left blank.
fn manual_submit_scenario(mut session: TestSession) -> Result<SessionResult, AppError> {
    session.start()?;
    let bank = Arc::clone(session.bank());

    for (index, question) in bank.questions().iter().enumerate() {
        let key = question.correct_option();
        match index {
            0..=6 => session.answer(question.id, key)?,
            7 | 8 => session.answer(question.id, (key + 1) % question.options.len())?,
            _ => {
                session.flag(question.id)?;
            }
        }
    }

    for _ in 0..MANUAL_ELAPSED_SECONDS {
        session.tick();
    }

    let preview = session.submission_preview();
    if let Some(warning) = &preview.warning {
        tracing::debug!(%warning, "submitting with unanswered questions");
    }
    Ok(session.submit(SubmitReason::Manual)?)
}

fn timeout_scenario(mut session: TestSession) -> Result<SessionResult, AppError> {
    session.start()?;
    let bank = Arc::clone(session.bank());

    for question in bank.questions().iter().take(3) {
        session.answer(question.id, question.correct_option())?;
    }

    loop {
        match session.tick() {
            SessionTick::Running { .. } => continue,
            SessionTick::Expired(result) => return Ok(*result),
            SessionTick::Inactive => {
                return session.result().cloned().ok_or_else(|| {
                    AppError::Usage("session stopped ticking without a result".to_string())
                })
            }
        }
    }
}

pub(crate) fn run_policy(args: PolicyArgs) -> Result<(), AppError> {
    let policy = CertificationPolicy::standard();
    let outcome = policy.decide(args.step, args.score);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let band = ScoreBand::from_percentage(args.score, &policy.bands());
    println!("{} at {}%", args.step.label(), args.score);
    println!("- {}", outcome.summary());
    println!("- Badge: {}", outcome.badge());
    println!("- Band: {} ({})", band.label(), band.message(&outcome));
    if let Some(next) = outcome.advance_to {
        println!("- Next: {}", next.label());
    }
    Ok(())
}

pub(crate) fn run_bank_listing(args: BankArgs, config: &AppConfig) -> Result<(), AppError> {
    let source = bank_source(&config.assessment, args.step, args.csv)?;
    let bank = source.load_question_bank(args.step)?;

    println!(
        "{} | {} questions | {} time limit | pass threshold {}%",
        args.step.label(),
        bank.len(),
        format_clock(bank.time_limit_seconds()),
        bank.pass_threshold()
    );
    for (index, question) in bank.questions().iter().enumerate() {
        let public = question.to_public();
        println!(
            "\n{}. [{} | {}] {}",
            index + 1,
            public.competency,
            public.level,
            public.prompt
        );
        for (option_index, option) in public.options.iter().enumerate() {
            println!("   {}) {}", option_letter(option_index), option);
        }
    }
    Ok(())
}

pub(crate) fn render_report(report: &ResultReport) {
    println!("{} results", report.step_label);
    println!(
        "  Score: {}% ({}) - {}",
        report.percentage,
        report.band.label(),
        report.badge
    );
    println!("  {}", report.message);
    println!(
        "  Correct {} | Incorrect {} | Unanswered {} | Time spent {} | Submitted: {}",
        report.correct, report.incorrect, report.unanswered, report.time_spent, report.submitted_by
    );
    println!("  Competencies:");
    for row in &report.competencies {
        println!(
            "    - {}: {}/{} ({}%)",
            row.competency, row.correct, row.total, row.percentage
        );
    }
    if !report.recommendations.is_empty() {
        println!("  Recommendations:");
        for line in &report.recommendations {
            println!("    - {}", line);
        }
    }
    println!(
        "  Certificate: {}",
        if report.certificate_eligible {
            "available for download"
        } else {
            "not available"
        }
    );
    if let Some(next) = &report.next_step_label {
        println!("  {}", next);
    }
}

pub(crate) fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|offset| *offset < 26)
        .map(|offset| char::from(b'A' + offset))
        .unwrap_or('?')
}
