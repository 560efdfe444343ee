// Public library interface for budget-treemap
// Shared by the report binary and the debug CLI tool

pub mod app;
pub mod config;
pub mod layout;
pub mod loader;
pub mod render;
pub mod tree;
pub mod ui;
