pub mod client;
pub mod models;
pub mod parse;
pub mod prompts;
