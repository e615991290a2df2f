//! # Derm Core
//!
//! Shared vocabulary for the dermatology examination system.
//!
//! This crate contains pure, read-only data operations:
//! - the code-to-label registry for disease classes and anatomical locations, with the curated
//!   option lists shown in selection widgets
//! - normalisation of raw classification-model labels onto the disease vocabulary
//! - validation of codes against the registry and the backend's storage widths
//! - the typed dev-proxy configuration record
//!
//! **No transport concerns**: the classification service, HTTP clients and the proxy itself live
//! outside this workspace.

pub mod config;
pub mod constants;
pub mod display;
pub mod normalise;
pub mod prediction;
pub mod registry;
pub mod validation;

mod dictionary;
mod error;

pub use config::DevProxyConfig;
pub use display::{format_with_code, parse_code_suffix};
pub use error::{RegistryError, RegistryResult};
pub use normalise::normalise_model_label;
pub use prediction::{AnalysisResult, Prediction};
pub use registry::{
    CodeEntry, CodeLabelRegistry, CodeTable, CodeTableBuilder, Domain, OptionList,
    RegistryBuilder,
};
pub use validation::{resolve_examination_location, validate_diagnosis_code};

pub use derm_types::{Code, CodeError, Label};
