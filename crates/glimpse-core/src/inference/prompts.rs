//! Fixed prompts used for the four-field image analysis.

use serde::{Deserialize, Serialize};

/// Prompt echoed in a degraded reply when a caption-only backend is out of quota.
pub const CAPTION_PROMPT: &str = "Generate a caption for this image.";

/// One field of a four-field analysis, each backed by its own prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisField {
    Description,
    Caption,
    Tags,
    Story,
}

impl AnalysisField {
    /// All fields in display order.
    pub const ALL: [AnalysisField; 4] = [
        AnalysisField::Description,
        AnalysisField::Caption,
        AnalysisField::Tags,
        AnalysisField::Story,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            AnalysisField::Description => {
                "Describe this image in detail, include context and objects you see."
            }
            AnalysisField::Caption => "Write a short catchy caption for this image.",
            AnalysisField::Tags => "Generate a list of 5 short tags for this image.",
            AnalysisField::Story => {
                "Write a short 3-sentence fictional story inspired by this image."
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisField::Description => "Description",
            AnalysisField::Caption => "Caption",
            AnalysisField::Tags => "Tags",
            AnalysisField::Story => "Story",
        }
    }
}
