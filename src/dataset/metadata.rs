// src/dataset/metadata.rs
//
// Filename metadata parsing for the dataset naming convention:
// Modality-VocalChannel-Emotion-Intensity-Statement-Repetition-Actor.wav

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ParseMismatch;

const DELIMITER: char = '-';
const TOKEN_COUNT: usize = 7;

/// Acted emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgust,
    Surprised,
    Unknown,
}

impl Emotion {
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => Emotion::Neutral,
            "02" => Emotion::Calm,
            "03" => Emotion::Happy,
            "04" => Emotion::Sad,
            "05" => Emotion::Angry,
            "06" => Emotion::Fearful,
            "07" => Emotion::Disgust,
            "08" => Emotion::Surprised,
            _ => Emotion::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Calm => "calm",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgust => "disgust",
            Emotion::Surprised => "surprised",
            Emotion::Unknown => "unknown",
        }
    }
}

/// Emotional intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Normal,
    Strong,
    Unknown,
}

impl Intensity {
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => Intensity::Normal,
            "02" => Intensity::Strong,
            _ => Intensity::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Normal => "normal",
            Intensity::Strong => "strong",
            Intensity::Unknown => "unknown",
        }
    }
}

/// Spoken sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Statement {
    #[serde(rename = "Kids are talking by the door")]
    KidsTalking,
    #[serde(rename = "Dogs are sitting by the door")]
    DogsSitting,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Statement {
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => Statement::KidsTalking,
            "02" => Statement::DogsSitting,
            _ => Statement::Unknown,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Statement::KidsTalking => "Kids are talking by the door",
            Statement::DogsSitting => "Dogs are sitting by the door",
            Statement::Unknown => "unknown",
        }
    }
}

/// Speaker gender, derived from actor id parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Odd actors are male, even actors female
    pub fn from_actor_id(actor_id: u64) -> Self {
        if actor_id % 2 == 1 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(Emotion, name);
display_via!(Intensity, name);
display_via!(Statement, text);
display_via!(Gender, name);

/// Fields decoded from a dataset filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub filename: String,
    pub modality: String,
    pub vocal_channel: String,
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub statement: Statement,
    pub repetition: String,
    pub actor_id: u64,
    pub gender: Gender,
}

/// One catalogued audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRecord {
    #[serde(flatten)]
    pub metadata: RecordMetadata,
    pub file_path: PathBuf,
}

impl AudioRecord {
    /// Parse the file name of `path` into a record
    pub fn from_path(path: &Path) -> Result<Self, ParseMismatch> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(ParseMismatch::EmptyStem)?;
        let metadata = parse_filename(&filename)?;
        Ok(Self {
            metadata,
            file_path: path.to_path_buf(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }

    pub fn emotion(&self) -> Emotion {
        self.metadata.emotion
    }

    pub fn gender(&self) -> Gender {
        self.metadata.gender
    }

    pub fn actor_id(&self) -> u64 {
        self.metadata.actor_id
    }
}

/// Parse a bare filename into its metadata fields.
///
/// Pure: no filesystem access. Unknown emotion/intensity/statement codes map
/// to `Unknown`; only a wrong token count or a non-integer actor id make the
/// whole parse fail.
pub fn parse_filename(filename: &str) -> Result<RecordMetadata, ParseMismatch> {
    let stem = file_stem(filename);
    if stem.is_empty() {
        return Err(ParseMismatch::EmptyStem);
    }

    let parts: Vec<&str> = stem.split(DELIMITER).collect();
    if parts.len() != TOKEN_COUNT {
        return Err(ParseMismatch::TokenCount(parts.len()));
    }

    let actor_token = parts[6];
    let actor_id: u64 = actor_token
        .trim()
        .parse()
        .map_err(|_| ParseMismatch::ActorId(actor_token.to_string()))?;

    Ok(RecordMetadata {
        filename: filename.to_string(),
        modality: parts[0].to_string(),
        vocal_channel: parts[1].to_string(),
        emotion: Emotion::from_code(parts[2]),
        intensity: Intensity::from_code(parts[3]),
        statement: Statement::from_code(parts[4]),
        repetition: parts[5].to_string(),
        actor_id,
        gender: Gender::from_actor_id(actor_id),
    })
}

/// Strip the last extension, keeping dotfiles intact
fn file_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(idx) => &filename[..idx],
    }
}

/// Human-facing view of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDisplay {
    pub emotion: String,
    pub speaker_id: String,
    pub gender: String,
    pub intensity: String,
    pub sentence: String,
    pub filename: String,
    pub file_path: String,
}

impl From<&AudioRecord> for RecordDisplay {
    fn from(record: &AudioRecord) -> Self {
        let meta = &record.metadata;
        Self {
            emotion: capitalize(meta.emotion.name()),
            speaker_id: format!("Actor_{:02}", meta.actor_id),
            gender: meta.gender.to_string(),
            intensity: meta.intensity.to_string(),
            sentence: meta.statement.to_string(),
            filename: meta.filename.clone(),
            file_path: record.file_path.display().to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
