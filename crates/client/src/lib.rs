//! Client code for jobscout.
//!
//! This crate provides the SSRF guard, the two-tier fetch pipeline, job
//! description selection and sanitizing, and the language-model analyzer
//! shared by the server and CLI.

pub mod analyze;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod pipeline;
pub mod render;

pub use analyze::{Analysis, AnalysisResult, Analyzer, SkillCategory};
pub use extract::{AtsVendor, clean, extract_text, select};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageFetcher, is_private_host};
pub use pipeline::{Extraction, JdPipeline, PipelineConfig, Tier, UrlAnalysis};
pub use render::{RenderOptions, Renderer};
