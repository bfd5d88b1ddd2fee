//! This module contains the actual syscall handlers
//!
//! Handlers return `SysResult<i64>`; the dispatcher turns that into the raw
//! Linux return value with [`syscall_return`] and nothing else ever encodes
//! an error into a return value.
pub mod fs_calls;
pub mod time_calls;

use crate::cage::Cage;
use crate::interface::{SysResult, SyscallArgs};

/// Shape of a filesystem handler.
pub type FsCallFunc = fn(&Cage, &SyscallArgs) -> SysResult<i64>;
/// Shape of a time handler; these don't need a cage.
pub type TimeCallFunc = fn(&SyscallArgs) -> SysResult<i64>;

/// Success passes through, failure becomes `-errno`.
pub fn syscall_return(call: &'static str, result: SysResult<i64>) -> i64 {
    match result {
        Ok(ret) => ret,
        Err(err) => {
            tracing::debug!(call, failed = err.call(), errno = ?err.errno(), "syscall failed");
            -(err.errno() as i64)
        }
    }
}
