use super::super::bank::{QuestionBank, QuestionBankError};
use super::super::domain::{AssessmentStep, LevelTag, Question, QuestionId};
use super::{ContentError, QuestionBankProvider};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 10 * 60;
pub const DEFAULT_PASS_THRESHOLD: u8 = 44;

type Entry = (
    u32,
    &'static str,
    LevelTag,
    &'static str,
    [&'static str; 4],
    usize,
);

const STEP_ONE: [Entry; 10] = [
    (101, "Digital Literacy", LevelTag::A1, "What does a web browser do?",
        ["Edits photos", "Displays web pages", "Stores backups", "Scans for viruses"], 1),
    (102, "Digital Safety", LevelTag::A1, "Which of these is the strongest password?",
        ["123456", "password", "Blue!Kettle7Rain", "your birth date"], 2),
    (103, "Digital Communication", LevelTag::A1, "What is the subject line of an email for?",
        ["Summarising the message", "Listing recipients", "Attaching files", "Signing the message"], 0),
    (104, "Information Management", LevelTag::A1, "Where are files moved when you delete them on most desktops?",
        ["They are erased instantly", "To the recycle bin or trash", "To the cloud", "To the downloads folder"], 1),
    (105, "Problem Solving", LevelTag::A1, "An application stops responding. What is a sensible first step?",
        ["Buy a new computer", "Close and reopen the application", "Delete the application files", "Unplug the router"], 1),
    (106, "Digital Safety", LevelTag::A2, "What does the padlock icon in the address bar indicate?",
        ["The site is government-run", "The connection is encrypted", "The site is ad-free", "The page is cached"], 1),
    (107, "Digital Content Creation", LevelTag::A2, "Which file format is best suited to a photograph?",
        ["JPEG", "TXT", "CSV", "MP3"], 0),
    (108, "Information Management", LevelTag::A2, "Which search query finds pages containing an exact phrase?",
        ["Using ALL CAPS", "Wrapping the phrase in quotes", "Adding a question mark", "Typing it twice"], 1),
    (109, "Digital Communication", LevelTag::A2, "What does BCC do when sending an email?",
        ["Encrypts the message", "Hides recipients from each other", "Marks it as urgent", "Requests a read receipt"], 1),
    (110, "Problem Solving", LevelTag::A2, "A website shows outdated content. What often helps?",
        ["Refreshing or clearing the cache", "Changing the screen resolution", "Restarting the printer", "Renaming the bookmark"], 0),
];

const STEP_TWO: [Entry; 10] = [
    (1, "Digital Communication", LevelTag::B1, "Which of the following is the most secure way to share sensitive documents online?",
        ["Email attachment", "Cloud storage with password protection", "Social media messaging", "Public file sharing platform"], 1),
    (2, "Digital Content Creation", LevelTag::B1, "What is the primary advantage of using vector graphics over raster images?",
        ["Smaller file size", "Better color accuracy", "Scalability without quality loss", "Faster loading times"], 2),
    (3, "Digital Safety", LevelTag::B2, "Which authentication method provides the highest level of security?",
        ["Single password", "Two-factor authentication", "Biometric authentication", "Multi-factor authentication"], 3),
    (4, "Information Management", LevelTag::B1, "What is the best practice for organizing digital files?",
        ["Store everything in one folder", "Use descriptive names and folder structure", "Rely on search functionality only", "Keep files on desktop for easy access"], 1),
    (5, "Problem Solving", LevelTag::B2, "When troubleshooting a software issue, what should be your first step?",
        ["Reinstall the software", "Contact technical support", "Restart the computer", "Check for recent changes or updates"], 3),
    (6, "Digital Literacy", LevelTag::B1, "What does 'cloud computing' primarily refer to?",
        ["Weather prediction software", "Storing and accessing data over the internet", "High-altitude internet connections", "Wireless networking technology"], 1),
    (7, "Digital Communication", LevelTag::B2, "Which protocol is most commonly used for secure web browsing?",
        ["HTTP", "FTP", "HTTPS", "SMTP"], 2),
    (8, "Digital Content Creation", LevelTag::B2, "What is the recommended resolution for web images to balance quality and loading speed?",
        ["72 DPI", "150 DPI", "300 DPI", "600 DPI"], 0),
    (9, "Digital Safety", LevelTag::B1, "What should you do if you receive a suspicious email asking for personal information?",
        ["Reply with the requested information", "Forward it to friends for verification", "Delete it immediately and report as spam", "Click the links to verify authenticity"], 2),
    (10, "Problem Solving", LevelTag::B1, "Which of the following is the best approach to learning new digital tools?",
        ["Trial and error without guidance", "Reading documentation and practicing", "Asking others to do it for you", "Avoiding new tools altogether"], 1),
];

const STEP_THREE: [Entry; 10] = [
    (301, "Digital Safety", LevelTag::C1, "What is the main purpose of a password manager's master key derivation function?",
        ["Compressing the vault", "Slowing down brute-force guessing", "Syncing devices faster", "Generating usernames"], 1),
    (302, "Information Management", LevelTag::C1, "Which backup strategy keeps three copies on two media with one off-site?",
        ["Mirror-only", "3-2-1", "Incremental-forever", "Grandfather-son"], 1),
    (303, "Digital Content Creation", LevelTag::C1, "Which licence lets others adapt your work commercially if they credit you?",
        ["All rights reserved", "CC BY", "CC BY-NC-ND", "Public trade secret"], 1),
    (304, "Problem Solving", LevelTag::C1, "A spreadsheet formula returns different results on two machines. What do you check first?",
        ["Monitor brightness", "Regional and calculation settings", "Keyboard layout only", "The printer driver"], 1),
    (305, "Digital Communication", LevelTag::C1, "What does end-to-end encryption guarantee in a messaging app?",
        ["Messages never expire", "Only participants can read message content", "Metadata is hidden from everyone", "Messages cannot be forwarded"], 1),
    (306, "Digital Safety", LevelTag::C2, "Which indicator most strongly suggests a spear-phishing attempt?",
        ["A generic greeting", "Personal details combined with an urgent credential request", "A newsletter footer", "An unsubscribe link"], 1),
    (307, "Information Management", LevelTag::C2, "What is the purpose of data minimisation under privacy regulation?",
        ["Compressing databases", "Collecting only data needed for a stated purpose", "Deleting all logs daily", "Storing data in one region"], 1),
    (308, "Digital Literacy", LevelTag::C2, "Why can an algorithmic news feed narrow the viewpoints a user sees?",
        ["It ranks by engagement with past behaviour", "It removes advertising", "It sorts strictly by date", "It shows random sources"], 0),
    (309, "Problem Solving", LevelTag::C2, "Automating a repetitive report, what should you design first?",
        ["The colour scheme", "The inputs, outputs and failure cases", "The file name", "The font size"], 1),
    (310, "Digital Content Creation", LevelTag::C2, "Which practice best improves the accessibility of published images?",
        ["Larger file sizes", "Meaningful alternative text", "Animated borders", "Watermarks"], 1),
];

/// Built-in question banks for all three steps, ten questions each.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    banks: BTreeMap<AssessmentStep, Arc<QuestionBank>>,
}

impl BuiltinCatalog {
    pub fn standard() -> Result<Self, QuestionBankError> {
        let mut banks = BTreeMap::new();
        for (step, entries) in [
            (AssessmentStep::One, &STEP_ONE),
            (AssessmentStep::Two, &STEP_TWO),
            (AssessmentStep::Three, &STEP_THREE),
        ] {
            let bank = QuestionBank::new(
                step,
                entries.iter().map(to_question).collect(),
                DEFAULT_TIME_LIMIT_SECONDS,
                DEFAULT_PASS_THRESHOLD,
            )?;
            banks.insert(step, Arc::new(bank));
        }
        Ok(Self { banks })
    }
}

impl QuestionBankProvider for BuiltinCatalog {
    fn load_question_bank(
        &self,
        step: AssessmentStep,
    ) -> Result<Arc<QuestionBank>, ContentError> {
        self.banks
            .get(&step)
            .cloned()
            .ok_or(ContentError::MissingStep(step))
    }
}

fn to_question(entry: &Entry) -> Question {
    let (id, competency, level, prompt, options, correct) = *entry;
    Question::new(
        QuestionId(id),
        competency,
        level,
        prompt,
        options.iter().map(|option| option.to_string()).collect(),
        correct,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_has_a_valid_bank() {
        let catalog = BuiltinCatalog::standard().expect("catalog validates");
        for step in AssessmentStep::ordered() {
            let bank = catalog.load_question_bank(step).expect("bank present");
            assert_eq!(bank.len(), 10);
            assert_eq!(bank.time_limit_seconds(), 600);
            assert_eq!(bank.pass_threshold(), 44);
            assert!(bank.questions().iter().all(|question| step.covers(question.level)));
        }
    }
}
