//! Address Editor Module
//!
//! Lets a customer edit their shipping address and persist it with a single
//! `PUT` to the storefront backend.
//!
//! ## Public API
//!
//! The port and models live in the `address-editor-sdk` crate and are
//! re-exported here:
//! - `AddressUpdateApi` - trait the editor submits drafts through
//! - `Address`, `AddressField`, `FieldValue`, `CustomerId` - data models
//! - `AddressUpdateError` - network failure classification
//!
//! Build an [`AddressEditorModule`] from configuration, then call
//! [`AddressEditorModule::editor`] once per customer surface.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use address_editor_sdk::{
    Address, AddressField, AddressUpdateApi, AddressUpdateError, CustomerId, FieldValue,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{AddressEditorModule, InitError};

pub mod config;
pub use config::{AddressEditorConfig, DraftPolicy, EditorMessages, TlsRoots};

pub mod domain;
pub use domain::editor::{AddressEditor, EditorSettings, EditorView, SkipReason, SubmitOutcome};
pub use domain::validation::{ValidationError, ValidationRules};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod infra;
