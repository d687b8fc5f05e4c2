//! Inkgate SDK - high-level API for the booking policy decision engine
//!
//! The SDK wires the storage layer to the pure evaluation engine and owns
//! the decision flow: fetch applicable rules, resolve, build the
//! explanation, persist the audit trail. It also exposes the management
//! operations the admin surfaces consume (rules, policy versions, warning
//! templates, audit queries).
//!
//! # Example
//!
//! ```rust,ignore
//! use inkgate_sdk::{DecisionRequest, PolicyEngineBuilder};
//! use inkgate_core::ScopeSelector;
//!
//! let engine = PolicyEngineBuilder::new()
//!     .with_seed_dir("seed")
//!     .build()
//!     .await?;
//!
//! let context = serde_json::from_value(serde_json::json!({
//!     "declared": { "wantsColor": true }
//! }))?;
//! let result = engine
//!     .decide(DecisionRequest::new(
//!         ScopeSelector::artist("ws_main", "art_joan"),
//!         context,
//!     ))
//!     .await?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod request;

pub use builder::PolicyEngineBuilder;
pub use engine::{EffectiveSettings, PolicyEngine, SettingsSource};
pub use error::{Result, SdkError};
pub use request::DecisionRequest;
