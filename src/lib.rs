//! Storefront Payments - Payment backend for an online storefront.
//!
//! This crate bridges a storefront to Stripe payment intents and a PayPal
//! checkout confirmation flow, and sends order-confirmation emails for every
//! completed payment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
