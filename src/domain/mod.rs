//! Domain layer.
//!
//! - `payment` - Payment requests, provider snapshots and order summaries
pub mod payment;
