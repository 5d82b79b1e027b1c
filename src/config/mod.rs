#[allow(clippy::module_inception)]
mod config;
mod run;

pub use config::Settings;
pub use run::{
    RunConfig, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE, DEFAULT_WORKER_COUNT, MAX_IN_FLIGHT,
    MAX_WORKER_COUNT,
};
