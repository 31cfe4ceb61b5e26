pub mod bootstrap;
pub mod executor;

pub use bootstrap::{BootstrapError, ClusterBootstrapper};
pub use executor::{ClusterError, SharedExecutor};
