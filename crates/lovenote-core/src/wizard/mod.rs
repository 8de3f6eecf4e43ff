//! The four-step submission wizard.
//!
//! - `schema`: pure per-step validation
//! - `enhance`: the optional message-rewrite capability
//! - `record`: draft to persisted record mapping
//! - `machine`: the state machine tying them to a draft slot

pub mod enhance;
pub mod machine;
pub mod record;
pub mod schema;

pub use enhance::{Enhancer, LlmEnhancer, NoEnhancer};
pub use machine::{Advanced, Submission, Wizard, WizardSettings, WizardSnapshot};
