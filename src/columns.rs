//! Header normalization and the fixed study-variable vocabulary.
//!
//! Upstream sheets are hand-edited, so headers arrive with incidental
//! whitespace (trailing spaces, stray newlines, the full-width space).
//! Normalization canonicalizes them before matching against the fixed
//! [`StudyVariable`] set; anything that still doesn't match is ignored
//! downstream.

use serde::{Deserialize, Serialize};

/// Canonicalizes a raw column header.
///
/// Trims leading/trailing whitespace and strips embedded carriage returns,
/// newlines, ASCII spaces, and the full-width space (U+3000). Idempotent.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | ' ' | '\u{3000}'))
        .collect()
}

/// Semantic grouping of study variables. Membership is static configuration,
/// not derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableGroup {
    Sleep,
    Korean,
    Math,
    English,
    Inquiry,
    /// Per-subject daily sums and the grand total.
    Combined,
}

/// One tracked study/sleep category, keyed by its sheet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StudyVariable {
    #[serde(rename = "수면")]
    Sleep,
    #[serde(rename = "낮잠")]
    Nap,

    #[serde(rename = "국어인강")]
    KoreanLecture,
    #[serde(rename = "국어자습")]
    KoreanSelfStudy,
    #[serde(rename = "국어학원")]
    KoreanAcademy,
    #[serde(rename = "국어숙제")]
    KoreanHomework,

    #[serde(rename = "수학인강")]
    MathLecture,
    #[serde(rename = "수학자습")]
    MathSelfStudy,
    #[serde(rename = "수학학원")]
    MathAcademy,
    #[serde(rename = "수학숙제")]
    MathHomework,

    #[serde(rename = "영어인강")]
    EnglishLecture,
    #[serde(rename = "영어자습")]
    EnglishSelfStudy,
    #[serde(rename = "영어학원")]
    EnglishAcademy,
    #[serde(rename = "영어숙제")]
    EnglishHomework,

    #[serde(rename = "탐구인강")]
    InquiryLecture,
    #[serde(rename = "탐구자습")]
    InquirySelfStudy,
    #[serde(rename = "탐구학원")]
    InquiryAcademy,
    #[serde(rename = "탐구숙제")]
    InquiryHomework,

    #[serde(rename = "국어합")]
    KoreanTotal,
    #[serde(rename = "수학합")]
    MathTotal,
    #[serde(rename = "영어합")]
    EnglishTotal,
    #[serde(rename = "탐구합")]
    InquiryTotal,
    #[serde(rename = "총합")]
    GrandTotal,
}

use StudyVariable::*;

/// Every recognized variable, in group order.
pub static ALL_VARIABLES: &[StudyVariable] = &[
    Sleep,
    Nap,
    KoreanLecture,
    KoreanSelfStudy,
    KoreanAcademy,
    KoreanHomework,
    MathLecture,
    MathSelfStudy,
    MathAcademy,
    MathHomework,
    EnglishLecture,
    EnglishSelfStudy,
    EnglishAcademy,
    EnglishHomework,
    InquiryLecture,
    InquirySelfStudy,
    InquiryAcademy,
    InquiryHomework,
    KoreanTotal,
    MathTotal,
    EnglishTotal,
    InquiryTotal,
    GrandTotal,
];

/// The four per-subject sum variables whose weekly means make up the
/// ranking total.
pub static SUBJECT_TOTALS: &[StudyVariable] =
    &[KoreanTotal, MathTotal, EnglishTotal, InquiryTotal];

/// The variables counted toward weekly sleep.
pub static SLEEP_VARIABLES: &[StudyVariable] = &[Sleep, Nap];

impl StudyVariable {
    /// The canonical sheet header for this variable.
    pub fn header(&self) -> &'static str {
        match self {
            Sleep => "수면",
            Nap => "낮잠",
            KoreanLecture => "국어인강",
            KoreanSelfStudy => "국어자습",
            KoreanAcademy => "국어학원",
            KoreanHomework => "국어숙제",
            MathLecture => "수학인강",
            MathSelfStudy => "수학자습",
            MathAcademy => "수학학원",
            MathHomework => "수학숙제",
            EnglishLecture => "영어인강",
            EnglishSelfStudy => "영어자습",
            EnglishAcademy => "영어학원",
            EnglishHomework => "영어숙제",
            InquiryLecture => "탐구인강",
            InquirySelfStudy => "탐구자습",
            InquiryAcademy => "탐구학원",
            InquiryHomework => "탐구숙제",
            KoreanTotal => "국어합",
            MathTotal => "수학합",
            EnglishTotal => "영어합",
            InquiryTotal => "탐구합",
            GrandTotal => "총합",
        }
    }

    /// Resolves a *normalized* header to a variable, if recognized.
    pub fn from_header(normalized: &str) -> Option<Self> {
        ALL_VARIABLES
            .iter()
            .copied()
            .find(|v| v.header() == normalized)
    }

    pub fn group(&self) -> VariableGroup {
        match self {
            Sleep | Nap => VariableGroup::Sleep,
            KoreanLecture | KoreanSelfStudy | KoreanAcademy | KoreanHomework => {
                VariableGroup::Korean
            }
            MathLecture | MathSelfStudy | MathAcademy | MathHomework => VariableGroup::Math,
            EnglishLecture | EnglishSelfStudy | EnglishAcademy | EnglishHomework => {
                VariableGroup::English
            }
            InquiryLecture | InquirySelfStudy | InquiryAcademy | InquiryHomework => {
                VariableGroup::Inquiry
            }
            KoreanTotal | MathTotal | EnglishTotal | InquiryTotal | GrandTotal => {
                VariableGroup::Combined
            }
        }
    }
}
