//! Schemascan Audit - structured-data compliance pipeline.
//!
//! This crate holds the core of the scanner: DOM-aware content extraction
//! (JSON-LD blocks and visible text), prompt construction for the analysis
//! backend, defensive normalization of its free-form reply, and the
//! orchestrator that sequences fetch → extract → analyze into a single
//! [`ScanReport`].
//!
//! # Pipeline
//!
//! ```text
//! URL → PageFetcher → rendered HTML → ContentExtractor → ExtractedContent
//!                                                            ↓
//!                           ScanReport ← ViolationAnalyzer ← prompt
//! ```
//!
//! The "intelligence" (violation detection) is delegated to an external
//! model behind [`schemascan_llm::LlmProvider`]; this crate's job is to
//! prepare the model's input faithfully and normalize its output
//! defensively. Tests mock the provider rather than depending on real
//! model output.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod analyzer;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use analyzer::ViolationAnalyzer;
pub use error::{AnalysisError, Result, ScanError};
pub use extract::{truncate_chars, ContentExtractor, ExtractedContent};
pub use orchestrator::{parse_scan_url, ScanOrchestrator};
pub use report::{Analysis, ScanReport, ScanStatus, Severity, Violation};
