//! Host errno -> Linux errno translation and the error type every handler
//! returns.
//!
//! Host failures are read from the host's last-error value immediately after
//! the failing call and mapped by *name* onto the Linux namespace. On a Linux
//! host the mapping is the identity; on any other host the numeric values
//! differ and this table is what keeps the emulated process seeing Linux
//! codes.
use sysdefs::constants::Errno;
use thiserror::Error;

/// Every way a handler or node operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyscallError {
    /// The host call itself failed; `errno` is the translated host code.
    #[error("{call}: host call failed with {errno:?}")]
    Host { call: &'static str, errno: Errno },
    /// Rejected by this layer before any host call was issued.
    #[error("{call}: rejected with {errno:?}")]
    Invalid { call: &'static str, errno: Errno },
    /// A cross-node operation was asked to span two different backends.
    #[error("{call}: nodes are served by different backends")]
    BackendMismatch { call: &'static str },
}

impl SyscallError {
    /// The Linux errno the emulated process should observe.
    pub fn errno(&self) -> Errno {
        match *self {
            SyscallError::Host { errno, .. } | SyscallError::Invalid { errno, .. } => errno,
            SyscallError::BackendMismatch { .. } => Errno::EXDEV,
        }
    }

    /// Name of the operation that failed.
    pub fn call(&self) -> &'static str {
        match *self {
            SyscallError::Host { call, .. }
            | SyscallError::Invalid { call, .. }
            | SyscallError::BackendMismatch { call } => call,
        }
    }
}

pub type SysResult<T> = Result<T, SyscallError>;

/// Reads the host's last-error value for the calling thread.
pub fn get_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Overwrites the host's last-error value for the calling thread. Needed
/// around calls like `readdir` whose only failure signal is errno.
pub fn set_errno(value: i32) {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    unsafe {
        *libc::__errno_location() = value;
    }
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    unsafe {
        *libc::__error() = value;
    }
}

/// Builds a synthetic validation failure.
pub fn syscall_error(errno: Errno, call: &'static str) -> SyscallError {
    SyscallError::Invalid { call, errno }
}

/// Captures and translates the host's last error. Must be called before
/// anything else can clobber the host errno.
pub fn host_error(call: &'static str) -> SyscallError {
    let host = get_errno();
    let errno = Errno::from_host(host);
    tracing::trace!(call, host_errno = host, ?errno, "host call failed");
    SyscallError::Host { call, errno }
}

/// `-1` from an int-returning host call becomes the translated host error.
pub fn check(ret: libc::c_int, call: &'static str) -> SysResult<libc::c_int> {
    if ret == -1 {
        Err(host_error(call))
    } else {
        Ok(ret)
    }
}

/// Same as [`check`] for calls returning `ssize_t`.
pub fn check_size(ret: libc::ssize_t, call: &'static str) -> SysResult<usize> {
    if ret < 0 {
        Err(host_error(call))
    } else {
        Ok(ret as usize)
    }
}

/// Host errno -> Linux errno, by name. The first matching row wins, which
/// is what lets aliases like `EWOULDBLOCK`/`ENOTSUP` share a slot with the
/// code they equal on some hosts and not on others.
const HOST_ERRNO_TABLE: &[(libc::c_int, Errno)] = &[
    (libc::EPERM, Errno::EPERM),
    (libc::ENOENT, Errno::ENOENT),
    (libc::ESRCH, Errno::ESRCH),
    (libc::EINTR, Errno::EINTR),
    (libc::EIO, Errno::EIO),
    (libc::ENXIO, Errno::ENXIO),
    (libc::E2BIG, Errno::E2BIG),
    (libc::ENOEXEC, Errno::ENOEXEC),
    (libc::EBADF, Errno::EBADF),
    (libc::ECHILD, Errno::ECHILD),
    (libc::EAGAIN, Errno::EAGAIN),
    (libc::EWOULDBLOCK, Errno::EAGAIN),
    (libc::ENOMEM, Errno::ENOMEM),
    (libc::EACCES, Errno::EACCES),
    (libc::EFAULT, Errno::EFAULT),
    (libc::ENOTBLK, Errno::ENOTBLK),
    (libc::EBUSY, Errno::EBUSY),
    (libc::EEXIST, Errno::EEXIST),
    (libc::EXDEV, Errno::EXDEV),
    (libc::ENODEV, Errno::ENODEV),
    (libc::ENOTDIR, Errno::ENOTDIR),
    (libc::EISDIR, Errno::EISDIR),
    (libc::EINVAL, Errno::EINVAL),
    (libc::ENFILE, Errno::ENFILE),
    (libc::EMFILE, Errno::EMFILE),
    (libc::ENOTTY, Errno::ENOTTY),
    (libc::ETXTBSY, Errno::ETXTBSY),
    (libc::EFBIG, Errno::EFBIG),
    (libc::ENOSPC, Errno::ENOSPC),
    (libc::ESPIPE, Errno::ESPIPE),
    (libc::EROFS, Errno::EROFS),
    (libc::EMLINK, Errno::EMLINK),
    (libc::EPIPE, Errno::EPIPE),
    (libc::EDOM, Errno::EDOM),
    (libc::ERANGE, Errno::ERANGE),
    (libc::EDEADLK, Errno::EDEADLK),
    (libc::ENAMETOOLONG, Errno::ENAMETOOLONG),
    (libc::ENOLCK, Errno::ENOLCK),
    (libc::ENOSYS, Errno::ENOSYS),
    (libc::ENOTEMPTY, Errno::ENOTEMPTY),
    (libc::ELOOP, Errno::ELOOP),
    (libc::ENOMSG, Errno::ENOMSG),
    (libc::EIDRM, Errno::EIDRM),
    (libc::EREMOTE, Errno::EREMOTE),
    (libc::ENOLINK, Errno::ENOLINK),
    (libc::EPROTO, Errno::EPROTO),
    (libc::EMULTIHOP, Errno::EMULTIHOP),
    (libc::EBADMSG, Errno::EBADMSG),
    (libc::EOVERFLOW, Errno::EOVERFLOW),
    (libc::EILSEQ, Errno::EILSEQ),
    (libc::EUSERS, Errno::EUSERS),
    (libc::ENOTSOCK, Errno::ENOTSOCK),
    (libc::EDESTADDRREQ, Errno::EDESTADDRREQ),
    (libc::EMSGSIZE, Errno::EMSGSIZE),
    (libc::EPROTOTYPE, Errno::EPROTOTYPE),
    (libc::ENOPROTOOPT, Errno::ENOPROTOOPT),
    (libc::EPROTONOSUPPORT, Errno::EPROTONOSUPPORT),
    (libc::ESOCKTNOSUPPORT, Errno::ESOCKTNOSUPPORT),
    (libc::EOPNOTSUPP, Errno::EOPNOTSUPP),
    (libc::ENOTSUP, Errno::EOPNOTSUPP),
    (libc::EPFNOSUPPORT, Errno::EPFNOSUPPORT),
    (libc::EAFNOSUPPORT, Errno::EAFNOSUPPORT),
    (libc::EADDRINUSE, Errno::EADDRINUSE),
    (libc::EADDRNOTAVAIL, Errno::EADDRNOTAVAIL),
    (libc::ENETDOWN, Errno::ENETDOWN),
    (libc::ENETUNREACH, Errno::ENETUNREACH),
    (libc::ENETRESET, Errno::ENETRESET),
    (libc::ECONNABORTED, Errno::ECONNABORTED),
    (libc::ECONNRESET, Errno::ECONNRESET),
    (libc::ENOBUFS, Errno::ENOBUFS),
    (libc::EISCONN, Errno::EISCONN),
    (libc::ENOTCONN, Errno::ENOTCONN),
    (libc::ESHUTDOWN, Errno::ESHUTDOWN),
    (libc::ETOOMANYREFS, Errno::ETOOMANYREFS),
    (libc::ETIMEDOUT, Errno::ETIMEDOUT),
    (libc::ECONNREFUSED, Errno::ECONNREFUSED),
    (libc::EHOSTDOWN, Errno::EHOSTDOWN),
    (libc::EHOSTUNREACH, Errno::EHOSTUNREACH),
    (libc::EALREADY, Errno::EALREADY),
    (libc::EINPROGRESS, Errno::EINPROGRESS),
    (libc::ESTALE, Errno::ESTALE),
    (libc::EDQUOT, Errno::EDQUOT),
    (libc::ECANCELED, Errno::ECANCELED),
    (libc::EOWNERDEAD, Errno::EOWNERDEAD),
    (libc::ENOTRECOVERABLE, Errno::ENOTRECOVERABLE),
];

/// Host -> Linux errno translation.
pub trait FromHostErrno {
    fn from_host(host: i32) -> Self;
}

impl FromHostErrno for Errno {
    /// Codes the host has but Linux doesn't collapse to `EIO`.
    fn from_host(host: i32) -> Errno {
        HOST_ERRNO_TABLE
            .iter()
            .find(|(code, _)| *code == host)
            .map(|(_, errno)| *errno)
            .unwrap_or(Errno::EIO)
    }
}
