//! Results attached to uploaded images.

use serde::{Deserialize, Serialize};

use crate::inference::{AnalysisField, InferenceReply};

/// Four independent replies produced by a vision-chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub description: InferenceReply,
    pub caption: InferenceReply,
    pub tags: InferenceReply,
    pub story: InferenceReply,
}

impl Analysis {
    /// Analysis with the same reply in every field.
    pub fn uniform(reply: InferenceReply) -> Self {
        Self {
            description: reply.clone(),
            caption: reply.clone(),
            tags: reply.clone(),
            story: reply,
        }
    }

    pub fn field(&self, field: AnalysisField) -> &InferenceReply {
        match field {
            AnalysisField::Description => &self.description,
            AnalysisField::Caption => &self.caption,
            AnalysisField::Tags => &self.tags,
            AnalysisField::Story => &self.story,
        }
    }

    /// Fields paired with their labels, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (AnalysisField, &InferenceReply)> {
        AnalysisField::ALL
            .into_iter()
            .map(move |field| (field, self.field(field)))
    }
}

/// Result payload attached to an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Annotation {
    /// Single caption from a caption-only backend
    Caption(InferenceReply),
    /// Four-field analysis from a vision-chat backend
    Analysis(Analysis),
}

impl Annotation {
    /// Iterates over every reply contained in the annotation.
    pub fn replies(&self) -> Vec<&InferenceReply> {
        match self {
            Annotation::Caption(reply) => vec![reply],
            Annotation::Analysis(analysis) => analysis.fields().map(|(_, reply)| reply).collect(),
        }
    }

    /// True when every contained reply is a real model answer.
    pub fn is_complete_answer(&self) -> bool {
        self.replies().iter().all(|reply| reply.is_answer())
    }
}
