//! # style-analysis
//!
//! Structural parsing, rule-based detection, confidence scoring, the
//! style analyzer, the assembly-line rewriter, and the feedback service
//! that closes the loop from applied suggestions back into confidence
//! weighting.

#![allow(clippy::module_inception)]

pub mod analyzer;
pub mod confidence;
pub mod feedback;
pub mod parser;
pub mod progress;
pub mod rewrite;
pub mod rules;
pub mod toolkit;

pub use analyzer::{AnalyzeRequest, StyleAnalyzer};
pub use feedback::FeedbackService;
pub use progress::ProgressTracker;
pub use rewrite::{pool::RewritePool, AssemblyLineRewriter};
