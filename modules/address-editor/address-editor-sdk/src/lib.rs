#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Address Editor SDK
//!
//! This crate provides the public contract of the `address-editor` module:
//! - Model types (`Address`, `AddressField`, `FieldValue`, `CustomerId`)
//! - The `AddressUpdateApi` port the editor submits drafts through
//! - Error type (`AddressUpdateError`) with the three network failure kinds
//!
//! ## Usage
//!
//! ```ignore
//! use address_editor_sdk::{Address, AddressUpdateApi, CustomerId};
//!
//! let api: Arc<dyn AddressUpdateApi> = module.api();
//! api.update_address(&CustomerId::new("123.456.789-00"), &draft).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::AddressUpdateApi;
pub use errors::AddressUpdateError;
pub use models::{Address, AddressField, CustomerId, FieldValue};
