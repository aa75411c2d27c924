// Domain Layer - Command descriptors and exit status vocabulary

pub mod command;
pub mod status;
pub mod stream;

// Re-exports
pub use command::CommandSpec;
pub use status::{
    signal_exit_code, EXIT_SPAWN_FAILURE, EXIT_SUCCESS, EXIT_WAIT_FAILURE, SIGNAL_EXIT_BASE,
};
pub use stream::StreamKind;
