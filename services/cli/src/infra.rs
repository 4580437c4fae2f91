use competency_assessment::config::AssessmentConfig;
use competency_assessment::workflows::assessment::{
    AssessmentStep, BuiltinCatalog, ContentError, CsvQuestionBankProvider, QuestionBank,
    QuestionBankProvider, RecorderError, ResultRecorder, SessionResult,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Keeps results for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRecorder {
    results: Arc<Mutex<Vec<SessionResult>>>,
}

impl ResultRecorder for InMemoryResultRecorder {
    fn record_result(&self, result: &SessionResult) -> Result<(), RecorderError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|_| RecorderError::Unavailable("result store mutex poisoned".to_string()))?;
        guard.push(result.clone());
        Ok(())
    }
}

impl InMemoryResultRecorder {
    pub(crate) fn results(&self) -> Vec<SessionResult> {
        match self.results.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Question source chosen from flags and configuration.
pub(crate) enum BankSource {
    Builtin(BuiltinCatalog),
    Csv(CsvQuestionBankProvider),
}

impl QuestionBankProvider for BankSource {
    fn load_question_bank(
        &self,
        step: AssessmentStep,
    ) -> Result<Arc<QuestionBank>, ContentError> {
        match self {
            BankSource::Builtin(catalog) => catalog.load_question_bank(step),
            BankSource::Csv(provider) => provider.load_question_bank(step),
        }
    }
}

/// `--csv` wins for its step, then `ASSESSMENT_BANK_DIR`, then the built-in catalog.
pub(crate) fn bank_source(
    config: &AssessmentConfig,
    step: AssessmentStep,
    csv: Option<PathBuf>,
) -> Result<BankSource, ContentError> {
    if let Some(path) = csv {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let provider = CsvQuestionBankProvider::from_dir(dir).with_file(step, path);
        return Ok(BankSource::Csv(provider));
    }

    if let Some(dir) = &config.bank_dir {
        return Ok(BankSource::Csv(CsvQuestionBankProvider::from_dir(dir)));
    }

    Ok(BankSource::Builtin(BuiltinCatalog::standard()?))
}

pub(crate) fn parse_step(raw: &str) -> Result<AssessmentStep, String> {
    let number = raw
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("failed to parse '{raw}' as a step number ({err})"))?;
    AssessmentStep::try_from(number).map_err(|err| err.to_string())
}

pub(crate) fn parse_percentage(raw: &str) -> Result<u8, String> {
    match raw.trim().trim_end_matches('%').parse::<u8>() {
        Ok(value) if value <= 100 => Ok(value),
        Ok(value) => Err(format!("score must be between 0 and 100 (got {value})")),
        Err(err) => Err(format!("failed to parse '{raw}' as a percentage ({err})")),
    }
}
