pub mod args;
pub mod errors;
pub mod executables;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use args::validate_arg;
pub use errors::ProcessError;
pub use executables::{Toolchain, resolve_executable};
pub use runner::{CommandRunner, DEFAULT_PROCESS_TIMEOUT, LimitedRunner, ProcessRunner};
