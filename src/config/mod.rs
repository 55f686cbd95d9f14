//! Configuration module for EmoCheckr

mod settings;

pub use settings::{
    ClassifierParams, ConfigBuilder, FeatureParams, NormalizeParams, PipelineConfig,
};
