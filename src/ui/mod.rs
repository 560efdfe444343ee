pub mod input;
pub mod state;
pub mod tooltip;
