//! Question bank sources: the built-in catalog and CSV exports from the
//! content team.

mod catalog;
mod parser;

pub use catalog::{BuiltinCatalog, DEFAULT_PASS_THRESHOLD, DEFAULT_TIME_LIMIT_SECONDS};

use super::bank::{QuestionBank, QuestionBankError};
use super::domain::{AssessmentStep, UnknownLevel};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies the question bank for a step.
pub trait QuestionBankProvider: Send + Sync {
    fn load_question_bank(&self, step: AssessmentStep)
        -> Result<Arc<QuestionBank>, ContentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question bank CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("question bank rejected: {0}")]
    InvalidBank(#[from] QuestionBankError),
    #[error("row for question {id}: {source}")]
    UnknownLevel {
        id: u32,
        #[source]
        source: UnknownLevel,
    },
    #[error("row for question {id}: blank option before a filled one")]
    OptionGap { id: u32 },
    #[error("no question bank configured for {0}")]
    MissingStep(AssessmentStep),
}

/// Builds banks from CSV with the columns
/// `id,competency,level,prompt,option_a,option_b,option_c,option_d,correct`.
pub struct CsvQuestionBankImporter;

impl CsvQuestionBankImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        step: AssessmentStep,
        time_limit_seconds: u32,
        pass_threshold: u8,
    ) -> Result<QuestionBank, ContentError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, step, time_limit_seconds, pass_threshold)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        step: AssessmentStep,
        time_limit_seconds: u32,
        pass_threshold: u8,
    ) -> Result<QuestionBank, ContentError> {
        let questions = parser::parse_questions(reader)?;
        Ok(QuestionBank::new(
            step,
            questions,
            time_limit_seconds,
            pass_threshold,
        )?)
    }
}

/// Loads one CSV file per step, expecting `step1.csv` .. `step3.csv`.
#[derive(Debug, Clone)]
pub struct CsvQuestionBankProvider {
    files: BTreeMap<AssessmentStep, PathBuf>,
    time_limit_seconds: u32,
    pass_threshold: u8,
}

impl CsvQuestionBankProvider {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let files: BTreeMap<_, _> = AssessmentStep::ordered()
            .into_iter()
            .map(|step| (step, dir.join(format!("step{}.csv", step.number()))))
            .filter(|(_, path)| path.is_file())
            .collect();
        if files.is_empty() {
            tracing::warn!(
                dir = %dir.display(),
                "no step1.csv..step3.csv question banks found"
            );
        }

        Self {
            files,
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }

    pub fn with_file(mut self, step: AssessmentStep, path: impl Into<PathBuf>) -> Self {
        self.files.insert(step, path.into());
        self
    }

    pub fn with_time_limit(mut self, time_limit_seconds: u32) -> Self {
        self.time_limit_seconds = time_limit_seconds;
        self
    }

    pub fn steps(&self) -> impl Iterator<Item = AssessmentStep> + '_ {
        self.files.keys().copied()
    }
}

impl QuestionBankProvider for CsvQuestionBankProvider {
    fn load_question_bank(
        &self,
        step: AssessmentStep,
    ) -> Result<Arc<QuestionBank>, ContentError> {
        let path = self.files.get(&step).ok_or(ContentError::MissingStep(step))?;
        let bank = CsvQuestionBankImporter::from_path(
            path,
            step,
            self.time_limit_seconds,
            self.pass_threshold,
        )?;
        tracing::debug!(%step, path = %path.display(), questions = bank.len(), "loaded question bank");
        Ok(Arc::new(bank))
    }
}
