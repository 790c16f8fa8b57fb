pub(crate) mod bootstrap;
mod config;
mod level;
pub(crate) mod loop_runner;
mod player;
