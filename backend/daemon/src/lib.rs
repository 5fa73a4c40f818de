pub mod launcher;
pub mod liveness;
pub mod protocol;
pub mod windows_registry;
pub mod xdg;

pub use launcher::{DetachedSpawner, InstanceSpawner, LaunchPolicy, LaunchStatus, ensure_running};
pub use liveness::{PROBE_TIMEOUT, is_up};
pub use protocol::{Platform, SCHEME, current_platform, install_protocol};
