//! Constants specific to the translation layer rather than to Linux itself.

/// Maximum allowed path length.
/// Used to bound path arguments read out of the emulated process and as the
/// size of the `readlink` buffer.
pub const PATH_MAX: usize = 4096;

/// Number of argument slots in a syscall argument record. Six is the most
/// any Linux syscall takes.
pub const MAX_SYSCALL_ARGS: usize = 6;

/// Placeholder for unused syscall argument
pub const UNUSED_ARG: u64 = 0xDEADBEEF_DEADBEEF;

/// Environment variable that turns on fake-superuser ownership handling.
pub const FAKE_ROOT_ENV: &str = "RAWPOSIX_FAKE_ROOT";
