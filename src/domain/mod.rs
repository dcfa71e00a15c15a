//! Core domain types and logic.

pub mod config;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod indicator;
pub mod news;
pub mod pipeline;
pub mod price_series;
pub mod quant;
pub mod sentiment;
pub mod universe;
