pub mod analysis;
pub mod block;
pub mod document;
pub mod error;
pub mod rewrite;
pub mod session;

pub use analysis::{AnalysisResult, ContentTypeModifier, DocumentStats, RuleReliability};
pub use block::{BlockType, StructuralBlock, TableCellRef};
pub use document::{ContentType, Document, FormatHint};
pub use error::{ConfidenceBreakdown, Error, RuleCategory, Severity, Suggestion};
pub use rewrite::{Delta, Improvement, RewriteJob, StationOutput};
pub use session::{Channel, Feedback, FeedbackKind, Session};
