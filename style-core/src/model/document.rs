//! Document and the enumerations threaded through every component (§3).

use serde::{Deserialize, Serialize};

use crate::ids::DocumentId;

/// Format hint supplied by the caller, or `Auto` to let the Structural
/// Parser sniff it from the first 1 KiB (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    Auto,
    Plain,
    Markdown,
    Asciidoc,
}

impl FormatHint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Plain => "plain",
            Self::Markdown => "markdown",
            Self::Asciidoc => "asciidoc",
        }
    }
}

impl std::fmt::Display for FormatHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The six content-type buckets used by the confidence pipeline's content
/// modifier and the modular-compliance check (§4.3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Technical,
    Procedural,
    Narrative,
    Legal,
    Marketing,
    #[default]
    General,
}

impl ContentType {
    pub fn all() -> &'static [ContentType] {
        &[
            Self::Technical,
            Self::Procedural,
            Self::Narrative,
            Self::Legal,
            Self::Marketing,
            Self::General,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Procedural => "procedural",
            Self::Narrative => "narrative",
            Self::Legal => "legal",
            Self::Marketing => "marketing",
            Self::General => "general",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "technical" => Some(Self::Technical),
            "procedural" => Some(Self::Procedural),
            "narrative" => Some(Self::Narrative),
            "legal" => Some(Self::Legal),
            "marketing" => Some(Self::Marketing),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A byte-exact string plus an optional format hint. Immutable after
/// creation; identified by a content-addressed id (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    text: String,
    format_hint: FormatHint,
}

impl Document {
    pub fn new(text: impl Into<String>, format_hint: FormatHint) -> Self {
        let text = text.into();
        let id = DocumentId::from_content(text.as_bytes());
        Self {
            id,
            text,
            format_hint,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format_hint(&self) -> FormatHint {
        self.format_hint
    }
}
