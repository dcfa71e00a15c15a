//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod gemini_adapter;
pub mod http;
pub mod tavily_adapter;
pub mod yahoo_adapter;
