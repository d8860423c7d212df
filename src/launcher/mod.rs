//! Launch sequencing for the dashboard server.

pub mod browser;
pub mod command;
pub mod executor;
pub mod probe;

pub use executor::{run_launch, RuntimeExit};
pub use probe::{ensure_port_available, preflight, LaunchProbe, ResolvedLaunch, SystemLaunchProbe};
