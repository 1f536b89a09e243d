pub mod band;
pub mod command;
