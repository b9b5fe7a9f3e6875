pub mod config;
pub mod observer;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config_path};
pub use observer::TracingObserver;
pub use run::run;
pub use wiring::{wire_daemon, Daemon};
