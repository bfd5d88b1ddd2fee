//! The syscall argument record and helpers for reading it.
//!
//! A handler receives the six argument registers of the trapped Linux
//! syscall, in the Linux calling convention's order, as untyped 64-bit
//! slots. Each handler decides per slot whether to read it as a signed
//! value, an unsigned value or an address.
//!
//! Addresses are trusted: the dispatcher only hands over records whose
//! address slots are either null or point into the emulated process's own
//! memory, which this layer shares with the host.
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use sysdefs::constants::{Errno, MAX_SYSCALL_ARGS, PATH_MAX};

use super::errnos::{syscall_error, SysResult};

/// One untyped argument slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ArgSlot(pub u64);

impl ArgSlot {
    /// Signed reading, full width.
    pub fn s(self) -> i64 {
        self.0 as i64
    }

    /// Signed reading of the low 32 bits (`int` arguments).
    pub fn s32(self) -> i32 {
        self.0 as u32 as i32
    }

    /// Unsigned reading, full width.
    pub fn u(self) -> u64 {
        self.0
    }

    /// Unsigned reading of the low 32 bits (`unsigned int`, `mode_t`, `uid_t`).
    pub fn u32(self) -> u32 {
        self.0 as u32
    }

    /// Address reading.
    pub fn p<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Reinterprets the slot as a reference to `T`. Null is `EFAULT`.
    pub fn as_struct<'a, T>(self, call: &'static str) -> SysResult<&'a T> {
        let ptr = self.p::<T>();
        if ptr.is_null() {
            return Err(syscall_error(Errno::EFAULT, call));
        }
        Ok(unsafe { &*ptr })
    }

    /// Reinterprets the slot as a mutable reference to `T`. Null is `EFAULT`.
    pub fn as_struct_mut<'a, T>(self, call: &'static str) -> SysResult<&'a mut T> {
        let ptr = self.p::<T>();
        if ptr.is_null() {
            return Err(syscall_error(Errno::EFAULT, call));
        }
        Ok(unsafe { &mut *ptr })
    }

    /// Reinterprets the slot as a byte buffer of `len` bytes. Null is `EFAULT`.
    pub fn as_buf<'a>(self, len: usize, call: &'static str) -> SysResult<&'a mut [u8]> {
        let ptr = self.p::<u8>();
        if ptr.is_null() {
            return Err(syscall_error(Errno::EFAULT, call));
        }
        Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
    }

    /// Reads a NUL-terminated path as raw bytes, terminator excluded. Null
    /// is `EFAULT`; no terminator within `PATH_MAX` bytes is `ENAMETOOLONG`.
    /// Linux paths are bytes, so no encoding is imposed.
    pub fn as_path<'a>(self, call: &'static str) -> SysResult<&'a OsStr> {
        let ptr = self.p::<u8>() as *const u8;
        if ptr.is_null() {
            return Err(syscall_error(Errno::EFAULT, call));
        }
        // Scan byte by byte so we never read past the terminator.
        let mut len = 0;
        while unsafe { *ptr.add(len) } != 0 {
            len += 1;
            if len >= PATH_MAX {
                return Err(syscall_error(Errno::ENAMETOOLONG, call));
            }
        }
        let bytes = unsafe { std::slice::from_raw_parts(ptr, len) };
        Ok(OsStr::from_bytes(bytes))
    }
}

impl<T> From<*mut T> for ArgSlot {
    fn from(ptr: *mut T) -> Self {
        ArgSlot(ptr as usize as u64)
    }
}

impl<T> From<*const T> for ArgSlot {
    fn from(ptr: *const T) -> Self {
        ArgSlot(ptr as usize as u64)
    }
}

impl From<u64> for ArgSlot {
    fn from(v: u64) -> Self {
        ArgSlot(v)
    }
}

impl From<i64> for ArgSlot {
    fn from(v: i64) -> Self {
        ArgSlot(v as u64)
    }
}

/// The fixed-arity argument record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyscallArgs {
    pub a: [ArgSlot; MAX_SYSCALL_ARGS],
}

impl SyscallArgs {
    /// Builds a record from the leading slots; the rest are zero.
    pub fn new(slots: &[ArgSlot]) -> Self {
        debug_assert!(slots.len() <= MAX_SYSCALL_ARGS);
        let mut a = [ArgSlot::default(); MAX_SYSCALL_ARGS];
        for (dst, src) in a.iter_mut().zip(slots) {
            *dst = *src;
        }
        SyscallArgs { a }
    }

    pub fn from_raw(raw: [u64; MAX_SYSCALL_ARGS]) -> Self {
        SyscallArgs {
            a: raw.map(ArgSlot),
        }
    }

    pub fn arg(&self, index: usize) -> ArgSlot {
        self.a[index]
    }
}
