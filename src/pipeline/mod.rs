//! Training pipeline and observers
//!
//! This module provides:
//! - A headless training loop over a `GameController`
//! - Observers for progress, metrics, JSONL export and milestones

pub mod observers;
pub mod training;

pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver, ProgressObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
