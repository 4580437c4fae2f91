use crate::demo::{run_bank_listing, run_demo, run_policy, BankArgs, DemoArgs, PolicyArgs};
use crate::interactive::{run_take, TakeArgs};
use clap::{Parser, Subcommand};
use competency_assessment::config::AppConfig;
use competency_assessment::error::AppError;
use competency_assessment::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "competency-assessment",
    about = "Take and inspect timed digital competency assessments from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sit a timed assessment step interactively (default command)
    Take(TakeArgs),
    /// Run the scripted manual-submit and timeout scenarios
    Demo(DemoArgs),
    /// Show the certification decision for a step and score
    Policy(PolicyArgs),
    /// List the questions of a step without their answer keys
    Bank(BankArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Take(TakeArgs::default()));

    match command {
        Command::Take(args) => run_take(args, &config).await,
        Command::Demo(args) => run_demo(args),
        Command::Policy(args) => run_policy(args),
        Command::Bank(args) => run_bank_listing(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use competency_assessment::workflows::assessment::AssessmentStep;

    #[test]
    fn take_is_the_default_command() {
        let cli = Cli::try_parse_from(["competency-assessment"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn policy_arguments_are_validated() {
        let cli = Cli::try_parse_from([
            "competency-assessment",
            "policy",
            "--step",
            "3",
            "--score",
            "60",
            "--json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Policy(args)) => {
                assert_eq!(args.step, AssessmentStep::Three);
                assert_eq!(args.score, 60);
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "competency-assessment",
            "policy",
            "--step",
            "4",
            "--score",
            "60",
        ])
        .is_err());
    }
}
