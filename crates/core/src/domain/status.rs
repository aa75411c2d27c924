// Exit status sentinels (no magic values)

/// The child ran and exited cleanly
pub const EXIT_SUCCESS: i32 = 0;

/// Waiting on the child failed after it was started
pub const EXIT_WAIT_FAILURE: i32 = 1;

/// The child could not be started (or its pipes could not be attached)
pub const EXIT_SPAWN_FAILURE: i32 = 255;

/// Offset added to the signal number when a child is killed by a signal
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Exit code reported for a child terminated by `signal`
pub fn signal_exit_code(signal: i32) -> i32 {
    SIGNAL_EXIT_BASE + signal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_exit_code_follows_shell_convention() {
        assert_eq!(signal_exit_code(9), 137);
        assert_eq!(signal_exit_code(15), 143);
    }
}
