//! Instruction templates and the user-facing message catalogue.
//!
//! Every string the user can see lives here, in the application's language
//! (Indonesian), so wording changes never touch dispatch or session logic and
//! tests can compare results against the exact constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text inserted between the instruction and the contract text.
pub const DOCUMENT_SEPARATOR: &str = "\n\nBerikut adalah teks kontraknya:\n\n";

// ── Messages ─────────────────────────────────────────────────────────────

pub const APP_TITLE: &str = "Asisten Analisis Kontrak dengan OpenAI";
pub const CREDENTIAL_HEADER: &str = "Konfigurasi API";
pub const CREDENTIAL_LABEL: &str = "Masukkan OpenAI API Key";
pub const UPLOAD_LABEL: &str = "Unggah dokumen kontrak (PDF)";
pub const ANALYSIS_HEADER: &str = "Pilih Analisis yang Diinginkan";
pub const ANALYSIS_SELECT_LABEL: &str = "Pilih jenis analisis:";
pub const QUESTION_LABEL: &str = "Masukkan pertanyaan Anda:";
pub const ANALYZE_BUTTON: &str = "Analisis";
pub const RESULT_HEADER: &str = "Hasil Analisis";
pub const EXTRACTING_SPINNER: &str = "Mengekstrak teks dari PDF...";
pub const ANALYZING_SPINNER: &str = "Menganalisis dokumen dengan OpenAI...";

pub const CREDENTIAL_MISSING_WARNING: &str =
    "Silakan masukkan OpenAI API Key Anda di sidebar untuk melanjutkan.";
pub const EXTRACTION_SUCCESS: &str = "Teks berhasil diekstrak!";
pub const NO_TEXT_WARNING: &str =
    "Dokumen tidak mengandung teks yang dapat diekstrak (mungkin hasil pindaian).";
pub const QUESTION_MISSING_WARNING: &str = "Mohon masukkan pertanyaan Anda.";

pub const CREDENTIAL_NOT_CONFIGURED: &str = "Error: OpenAI API Key belum diatur.";
pub const RATE_LIMIT_MESSAGE: &str = "Anda telah mencapai batas penggunaan API. Mohon coba lagi nanti atau periksa paket langganan Anda.";
pub const AUTH_FAILED_MESSAGE: &str =
    "Autentikasi API gagal. Pastikan API key yang Anda masukkan benar dan valid.";

/// Message shown for an unclassified remote failure.
pub fn generic_failure_message(detail: &str) -> String {
    format!("Terjadi kesalahan: {detail}")
}

/// Message shown when the upload cannot be read as a PDF.
pub fn extraction_failure_message(detail: &str) -> String {
    format!("Terjadi kesalahan saat membaca file PDF: {detail}")
}

// ── Analysis kinds ───────────────────────────────────────────────────────

/// The four analyses offered once a document has been extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    /// A summary of the whole contract. (default)
    #[default]
    Summary,
    /// Key points, clauses and main terms.
    KeyPoints,
    /// Potential risks and legal issues.
    PotentialRisks,
    /// The user's own question.
    CustomQuestion,
}

impl AnalysisKind {
    /// All kinds, in display order.
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Summary,
        AnalysisKind::KeyPoints,
        AnalysisKind::PotentialRisks,
        AnalysisKind::CustomQuestion,
    ];

    /// Label shown in the selection control.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::Summary => "Ringkasan",
            AnalysisKind::KeyPoints => "Poin Penting",
            AnalysisKind::PotentialRisks => "Risiko Potensial",
            AnalysisKind::CustomQuestion => "Tanyakan Sesuai Kebutuhan",
        }
    }

    /// Stable identifier used in forms and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            AnalysisKind::Summary => "summary",
            AnalysisKind::KeyPoints => "key-points",
            AnalysisKind::PotentialRisks => "potential-risks",
            AnalysisKind::CustomQuestion => "custom-question",
        }
    }

    /// Fixed template text. For [`AnalysisKind::CustomQuestion`] this is the
    /// prompt shown above the question box, not what gets sent.
    pub fn template(self) -> &'static str {
        match self {
            AnalysisKind::Summary => "Buatkan ringkasan dari dokumen kontrak ini.",
            AnalysisKind::KeyPoints => {
                "Identifikasi poin-poin penting, klausul, dan ketentuan utama dalam dokumen ini."
            }
            AnalysisKind::PotentialRisks => {
                "Analisis risiko potensial dan masalah hukum yang mungkin ada dalam kontrak ini."
            }
            AnalysisKind::CustomQuestion => "Tuliskan pertanyaan spesifik Anda:",
        }
    }

    pub fn needs_question(self) -> bool {
        matches!(self, AnalysisKind::CustomQuestion)
    }

    /// The instruction to dispatch: the template, or the user's question for
    /// [`AnalysisKind::CustomQuestion`]. `None` when a question is required
    /// but blank.
    pub fn instruction(self, question: &str) -> Option<String> {
        if self.needs_question() {
            if question.trim().is_empty() {
                None
            } else {
                Some(question.to_string())
            }
        } else {
            Some(self.template().to_string())
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    /// Accepts the identifier, a short alias, or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AnalysisKind::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s) || k.label().eq_ignore_ascii_case(s))
            .or(match s.to_ascii_lowercase().as_str() {
                "risks" => Some(AnalysisKind::PotentialRisks),
                "question" | "ask" => Some(AnalysisKind::CustomQuestion),
                _ => None,
            })
            .ok_or_else(|| format!("unknown analysis '{s}'"))
    }
}

/// Combine an instruction and the contract text into the single prompt sent
/// to the model. The text is passed through untruncated.
pub fn build_prompt(instruction: &str, text: &str) -> String {
    let mut prompt =
        String::with_capacity(instruction.len() + DOCUMENT_SEPARATOR.len() + text.len());
    prompt.push_str(instruction);
    prompt.push_str(DOCUMENT_SEPARATOR);
    prompt.push_str(text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prompt_is_plain_concatenation() {
        let p = build_prompt("Buatkan ringkasan dari dokumen kontrak ini.", "PASAL 1");
        assert_eq!(
            p,
            "Buatkan ringkasan dari dokumen kontrak ini.\n\nBerikut adalah teks kontraknya:\n\nPASAL 1"
        );
    }

    #[test]
    fn build_prompt_does_not_truncate() {
        let text = "x".repeat(500_000);
        let p = build_prompt("q", &text);
        assert_eq!(p.len(), 1 + DOCUMENT_SEPARATOR.len() + 500_000);
    }

    #[test]
    fn fixed_kinds_use_their_template() {
        for kind in [
            AnalysisKind::Summary,
            AnalysisKind::KeyPoints,
            AnalysisKind::PotentialRisks,
        ] {
            assert_eq!(kind.instruction("ignored").as_deref(), Some(kind.template()));
        }
    }

    #[test]
    fn custom_question_requires_text() {
        assert_eq!(AnalysisKind::CustomQuestion.instruction("   "), None);
        assert_eq!(
            AnalysisKind::CustomQuestion.instruction("Siapa para pihak?").as_deref(),
            Some("Siapa para pihak?")
        );
    }

    #[test]
    fn parse_accepts_ids_labels_and_aliases() {
        assert_eq!("summary".parse::<AnalysisKind>(), Ok(AnalysisKind::Summary));
        assert_eq!("Poin Penting".parse::<AnalysisKind>(), Ok(AnalysisKind::KeyPoints));
        assert_eq!("risks".parse::<AnalysisKind>(), Ok(AnalysisKind::PotentialRisks));
        assert_eq!("question".parse::<AnalysisKind>(), Ok(AnalysisKind::CustomQuestion));
        assert!("poem".parse::<AnalysisKind>().is_err());
    }

    #[test]
    fn ids_round_trip() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.id().parse::<AnalysisKind>(), Ok(kind));
        }
    }
}
