// RawPOSIX Library - Linux syscall translation onto a POSIX host
//
// This library runs unmodified Linux programs' filesystem and time syscalls
// against the host: filesystem calls go through a tree of virtualization
// nodes backed by host directories, time calls are forwarded to the host's
// clock and timer facilities.

pub mod cage;
pub mod filesystem;
pub mod interface;
pub mod syscalls;

pub use cage::Cage;
pub use filesystem::VfsNode;
pub use interface::{SysResult, SyscallArgs, SyscallError, VfsConfig};
pub use syscalls::syscall_return;

#[cfg(test)]
mod tests;
