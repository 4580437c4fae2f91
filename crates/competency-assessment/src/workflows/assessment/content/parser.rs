use super::super::domain::{LevelTag, Question, QuestionId};
use super::ContentError;
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_questions<R: Read>(reader: R) -> Result<Vec<Question>, ContentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut questions = Vec::new();

    for record in csv_reader.deserialize::<QuestionRow>() {
        let row = record?;
        questions.push(row.into_question()?);
    }

    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: u32,
    competency: String,
    level: String,
    prompt: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_a: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_b: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_c: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_d: Option<String>,
    correct: usize,
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, ContentError> {
        let level = self
            .level
            .parse::<LevelTag>()
            .map_err(|source| ContentError::UnknownLevel {
                id: self.id,
                source,
            })?;

        // Only trailing columns may be blank; `correct` indexes the columns as written.
        let columns = [self.option_a, self.option_b, self.option_c, self.option_d];
        let filled = columns
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        let options = columns
            .into_iter()
            .take(filled)
            .collect::<Option<Vec<_>>>()
            .ok_or(ContentError::OptionGap { id: self.id })?;

        Ok(Question::new(
            QuestionId(self.id),
            self.competency,
            level,
            self.prompt,
            options,
            self.correct,
        ))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
