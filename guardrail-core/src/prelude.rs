//! Convenient imports for library consumers.
//!
//! ```rust,ignore
//! use guardrail_core::prelude::*;
//! ```

pub use crate::builder::Guardrail;
pub use crate::cancel::CancellationToken;
pub use crate::entry::{EntryPoint, EntryPointProvider, PatternEntryPoints};
pub use crate::error::{GuardrailError, GuardrailResult};
pub use crate::results::{AnalysisReport, AnalysisResult, PairedCallViolation, RuleResult};
pub use crate::rules::{MethodRef, PairedCallObligation, Rule};
