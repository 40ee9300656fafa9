pub mod assembler;
pub mod batch_fetcher;
pub mod browser;
pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod render;
