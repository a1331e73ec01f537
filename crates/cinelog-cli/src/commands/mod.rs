pub mod clear;
pub mod config;
pub mod movies;
pub mod stats;
pub mod theme;

mod prompts;
mod render;
