//! Game server log line classification.
//!
//! A [`Classifier`] is built once from a [`RulePatterns`] set and then maps
//! each raw line to at most one [`Event`]. Rules are tried in a fixed order
//! and the first match wins; chat lines and anything unrecognized map to
//! [`Event::Unclassified`].

mod classifier;
mod error;
mod event;
mod rules;

pub use classifier::Classifier;
pub use error::ClassifierError;
pub use event::Event;
pub use rules::RulePatterns;
