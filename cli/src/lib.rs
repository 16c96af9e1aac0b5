pub mod config;
pub mod encoding;
pub mod sources;
pub mod pipeline;
pub mod output;
