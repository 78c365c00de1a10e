pub mod commands;
pub mod signal;
pub mod ui;
