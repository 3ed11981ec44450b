//! Property Valuation - AI-assisted home value estimates
//!
//! This crate implements the gateway that asks a language model for a
//! structured property valuation, the gateway that forwards interested
//! leads to a sales inbox, and the client-side estimate pipeline that
//! drives both.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
