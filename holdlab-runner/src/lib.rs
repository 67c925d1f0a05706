//! HoldLab Runner: validation pipeline around `holdlab-core`.
//!
//! This crate provides:
//! - TOML pipeline configuration
//! - Reference table loading with logged fallbacks
//! - Single-dataset and parallel multi-file validation with dataset hashing
//! - Issue summaries, JSON reports and cleaned CSV artifacts
//! - Holdings sinks (CSV file, in-memory) and the upload step
//! - Seeded synthetic holdings, performance and attribute tables

pub mod config;
pub mod export;
pub mod pipeline;
pub mod reference;
pub mod sink;
pub mod synthetic;

pub use config::{
    ConfigError, OutputConfig, PipelineConfig, ReferenceConfig, SyntheticConfig, ValidationConfig,
};
pub use export::{export_report_json, import_report_json, load_artifacts, save_artifacts};
pub use pipeline::{
    compute_dataset_hash, run_validation, validate_file, validate_files, IssueSummary,
    PipelineError, PipelineRun, SCHEMA_VERSION,
};
pub use reference::{load_reference_data, ReferenceData, ReferenceSource, ReferenceSources};
pub use sink::{upload, CsvFileSink, HoldingsSink, MemorySink, SinkError};
pub use synthetic::{synthesize, synthesize_attributes, synthesize_performance};
