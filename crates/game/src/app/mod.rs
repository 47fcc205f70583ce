mod arena;
mod bootstrap;
mod config;
mod gameplay;
mod loop_runner;
mod masks;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
