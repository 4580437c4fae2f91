use crate::demo::{option_letter, render_report};
use crate::infra::{bank_source, parse_step, InMemoryResultRecorder};
use clap::Args;
use competency_assessment::config::AppConfig;
use competency_assessment::error::AppError;
use competency_assessment::workflows::assessment::{
    spawn_ticker, AssessmentService, AssessmentStep, ResultReport, SessionResult,
    SessionSnapshot, SharedSession, SubmitReason, TickerError,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct TakeArgs {
    /// Assessment step (1, 2 or 3)
    #[arg(long, value_parser = parse_step, default_value = "1")]
    pub(crate) step: AssessmentStep,
    /// CSV export to read instead of the configured bank
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

impl Default for TakeArgs {
    fn default() -> Self {
        Self {
            step: AssessmentStep::One,
            csv: None,
        }
    }
}

const HELP: &str = "Commands: a <option> answer (A-D or 1-4), n next, p previous, \
g <number> go to question, f toggle flag, s submit, ? help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Answer(usize),
    Next,
    Previous,
    GoTo(usize),
    Flag,
    Submit,
    Help,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let argument = parts.next();

    match (command.as_str(), argument) {
        ("a", Some(raw)) => parse_option(raw).map(Input::Answer),
        ("a", None) => Err("which option? e.g. `a B`".to_string()),
        ("n", None) => Ok(Input::Next),
        ("p", None) => Ok(Input::Previous),
        ("g", Some(raw)) => match raw.parse::<usize>() {
            Ok(number) if number > 0 => Ok(Input::GoTo(number - 1)),
            _ => Err(format!("'{raw}' is not a question number")),
        },
        ("g", None) => Err("which question? e.g. `g 4`".to_string()),
        ("f", None) => Ok(Input::Flag),
        ("s", None) => Ok(Input::Submit),
        ("?" | "h" | "help", _) => Ok(Input::Help),
        ("", _) => Err("empty command".to_string()),
        (other, _) => Err(format!("unknown command '{other}'")),
    }
}

fn parse_option(raw: &str) -> Result<usize, String> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Ok(usize::from(letter.to_ascii_uppercase() as u8 - b'A'))
        }
        _ => match raw.parse::<usize>() {
            Ok(number) if number > 0 => Ok(number - 1),
            _ => Err(format!("'{raw}' is not an option")),
        },
    }
}

type Ticker = JoinHandle<Result<SessionResult, TickerError>>;

enum Step {
    Continue,
    Finished(SessionResult),
}

/// Applies one command. The lock is released before returning.
fn apply(
    session: &SharedSession,
    input: Input,
    confirm_pending: &mut bool,
) -> Result<Step, AppError> {
    let mut guard = session.lock().map_err(|_| TickerError::Poisoned)?;

    if input != Input::Submit {
        *confirm_pending = false;
    }

    let applied = match input {
        Input::Answer(option) => {
            let options = guard.current_question().options.len();
            if option >= options {
                println!("Choose one of A-{}.", option_letter(options.saturating_sub(1)));
                return Ok(Step::Continue);
            }
            guard.answer_current(option)
        }
        Input::Next => guard.next().map(|_| ()),
        Input::Previous => guard.previous().map(|_| ()),
        Input::GoTo(index) => guard.go_to(index).map(|_| ()),
        Input::Flag => guard.flag_current().map(|flagged| {
            println!("{}", if flagged { "Flagged for review." } else { "Flag removed." });
        }),
        Input::Help => {
            println!("{HELP}");
            return Ok(Step::Continue);
        }
        Input::Submit => {
            let preview = guard.submission_preview();
            if let (Some(warning), false) = (&preview.warning, *confirm_pending) {
                println!("{warning} Type `s` again to submit.");
                *confirm_pending = true;
                return Ok(Step::Continue);
            }
            return Ok(Step::Finished(guard.submit(SubmitReason::Manual)?));
        }
    };

    // The ticker may have finalized the session between reads.
    if let Err(err) = applied {
        println!("{err}");
        return Ok(Step::Continue);
    }

    render_snapshot(&guard.snapshot());
    Ok(Step::Continue)
}

fn render_snapshot(snapshot: &SessionSnapshot) {
    let navigator = snapshot
        .navigator
        .iter()
        .map(|entry| {
            let mark = match (entry.current, entry.flagged, entry.answered) {
                (true, _, _) => '>',
                (false, true, _) => '?',
                (false, false, true) => '*',
                (false, false, false) => ' ',
            };
            format!("{}{}", entry.number, mark)
        })
        .collect::<Vec<_>>()
        .join(" ");

    println!(
        "\n{} ({}) | {} remaining{} | {} answered, {} flagged",
        snapshot.step,
        snapshot.level_pair,
        snapshot.countdown,
        if snapshot.time_running_out { " - time is running out" } else { "" },
        snapshot.answered,
        snapshot.flagged_count
    );
    println!("[{navigator}]");
    println!(
        "Question {} of {}{}: {}",
        snapshot.question_number,
        snapshot.total_questions,
        if snapshot.flagged { " (flagged)" } else { "" },
        snapshot.question.prompt
    );
    for (index, option) in snapshot.question.options.iter().enumerate() {
        let selected = if snapshot.selected_option == Some(index) { "(x)" } else { "( )" };
        println!("  {} {}) {}", selected, option_letter(index), option);
    }
}

/// Ends the session from the input side: the ticker stops and whatever
/// was answered so far is submitted.
fn stop_and_submit(session: &SharedSession, ticker: &Ticker) -> Result<SessionResult, AppError> {
    ticker.abort();
    let mut guard = session.lock().map_err(|_| TickerError::Poisoned)?;
    Ok(guard.submit(SubmitReason::Manual)?)
}

pub(crate) async fn run_take(args: TakeArgs, config: &AppConfig) -> Result<(), AppError> {
    let provider = Arc::new(bank_source(&config.assessment, args.step, args.csv)?);
    let recorder = Arc::new(InMemoryResultRecorder::default());
    let service = AssessmentService::new(provider, Arc::clone(&recorder))
        .with_settings(config.assessment.session_settings());

    let mut session = service.open_session(args.step)?;
    session.start()?;
    info!(step = %args.step, "interactive assessment started");

    println!("{}", args.step.label());
    println!("{HELP}");
    render_snapshot(&session.snapshot());

    let shared: SharedSession = Arc::new(Mutex::new(session));
    let mut ticker = spawn_ticker(Arc::clone(&shared), config.assessment.tick_period());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut confirm_pending = false;

    let result = loop {
        tokio::select! {
            joined = &mut ticker => {
                let result = joined??;
                println!("\nTime is up. Your answers were submitted automatically.");
                break result;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break stop_and_submit(&shared, &ticker)?,
                    Err(err) => {
                        let result = stop_and_submit(&shared, &ticker)?;
                        warn!(
                            error = %err,
                            percentage = result.score.percentage,
                            "failed to read input, answers submitted"
                        );
                        return Err(err.into());
                    }
                };
                match parse_input(&line) {
                    Ok(input) => {
                        if let Step::Finished(result) = apply(&shared, input, &mut confirm_pending)? {
                            ticker.abort();
                            break result;
                        }
                    }
                    Err(message) => println!("{message}. {HELP}"),
                }
            }
        }
    };

    println!();
    render_report(&ResultReport::from_result(&result, service.policy()));
    info!(recorded = recorder.results().len(), "interactive assessment finished");
    Ok(())
}
