//! Port traits: the narrow capabilities the pipeline needs from the outside world.

pub mod config_port;
pub mod market_data_port;
pub mod news_port;
pub mod report_port;
pub mod scoring_port;
