//! `AddressUpdateApi` trait definition.

use async_trait::async_trait;

use crate::errors::AddressUpdateError;
use crate::models::{Address, CustomerId};

/// Port through which the editor persists a draft.
///
/// Implementations make exactly one attempt per call and never retry.
/// Dropping the returned future abandons the request; the editor relies on
/// this to cancel a submission when the surface is closed.
#[async_trait]
pub trait AddressUpdateApi: Send + Sync {
    /// Replace the shipping address of `customer_id` with `address`.
    async fn update_address(
        &self,
        customer_id: &CustomerId,
        address: &Address,
    ) -> Result<(), AddressUpdateError>;
}
