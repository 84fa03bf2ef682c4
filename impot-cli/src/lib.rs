//! Command-line front end for the household income tax engine.

pub mod cli;
pub mod commands;
pub mod display;
pub mod logging;
