//! Data-loss-prevention decision engine.
//!
//! Two independent paths:
//! - [`detect`]: regex and heuristic detection of structured PII, with masking.
//! - [`service::DlpService::decide_similarity`]: nearest-neighbor similarity of
//!   a text against an indexed corpus of sensitive documents, bucketed into
//!   risk bands and rendered as ALLOW / HOLD_FOR_REVIEW / BLOCK.

pub mod cli;
pub mod config;
pub mod decision;
pub mod detect;
pub mod embed;
pub mod error;
pub mod extract;
pub mod search;
pub mod service;
pub mod similarity;
pub mod storage;

pub use error::{DlpError, Result};
