//! Command-line and HTTP front ends for promptlift.

pub mod logging;
pub mod output;
pub mod server;
pub mod startup;
