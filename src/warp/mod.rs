pub mod config;
pub mod falloff;
pub mod kernel;
pub mod sample;
pub mod spec;
