pub mod adapters;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod render;
pub mod terminal;
