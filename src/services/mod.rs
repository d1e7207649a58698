// SPDX-License-Identifier: MIT

//! Services module - façades over the hosted endpoints.

pub mod assistant;
pub mod identity;
pub mod quote;

pub use assistant::AssistantClient;
pub use identity::{Identity, IdentityClient};
pub use quote::QuoteClient;
