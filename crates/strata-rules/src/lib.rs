//! # strata-rules
//!
//! Built-in rules for strata.
//!
//! ## Available Rules
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | SL103 | `uninitialized-readonly-field` | warning | Readonly fields must be initialized or injected in a constructor |
//! | SL300 | `dal-low-level-call` | hidden | DAL method uses a low-level accessor (test-generation signal) |
//!
//! ## Usage
//!
//! ```ignore
//! use strata_core::Engine;
//! use strata_rules::built_in_rules;
//!
//! let mut engine = Engine::new();
//! for rule in built_in_rules() {
//!     engine.register_box(rule);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dal_low_level_call;
pub mod uninitialized_readonly_field;

pub use dal_low_level_call::DalLowLevelCall;
pub use uninitialized_readonly_field::UninitializedReadonlyField;

/// Re-export core types for convenience.
pub use strata_core::{Diagnostic, Rule, RuleBox, Severity};

/// All built-in rules, boxed for registration.
#[must_use]
pub fn built_in_rules() -> Vec<RuleBox> {
    vec![
        Box::new(UninitializedReadonlyField::new()),
        Box::new(DalLowLevelCall::new()),
    ]
}

/// Resolves rule names or codes to rules. Unknown names yield `None`.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    match name {
        uninitialized_readonly_field::NAME | uninitialized_readonly_field::CODE => {
            Some(Box::new(UninitializedReadonlyField::new()))
        }
        dal_low_level_call::NAME | dal_low_level_call::CODE => {
            Some(Box::new(DalLowLevelCall::new()))
        }
        _ => None,
    }
}
