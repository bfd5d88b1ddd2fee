//! The Linux errno namespace.
//!
//! These are the values the emulated process expects to see, negated, in a
//! failed syscall's return value. They are *not* the host's errno values:
//! a host may number the same condition differently, so host codes must be
//! mapped onto this enum before they cross back into the emulated process.

// Let's not have clippy warn for EAGAIN, etc.
#![allow(clippy::upper_case_acronyms)]
// Don't warn if all listed errnos are not used in code...
#![allow(dead_code)]

#[doc(hidden)]
macro_rules! reversible_enum {
    ($(#[$settings: meta])* $visibility: vis enum $enumname:ident {
        $($valuename: ident = $value: expr,)*
    }) => {
        $(#[$settings])*
        $visibility enum $enumname {
            $($valuename = $value,)*
        }

        impl $enumname {
            /// Looks up the variant carrying the numeric value `v`.
            $visibility fn from_discriminant(v: i32) -> Result<Self, ()> {
                match v {
                    $($value => Ok($enumname::$valuename),)*
                    _ => Err(()),
                }
            }
        }
    }
}

reversible_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(i32)]
    /// Errno values as numbered by Linux (asm-generic/errno-base.h, errno.h)
    pub enum Errno {
        EPERM = 1,	// Operation not permitted
        ENOENT = 2,     // No such file or directory
        ESRCH = 3,	// No such process
        EINTR = 4,	// Interrupted system call
        EIO = 5,	// I/O error
        ENXIO = 6,	// No such device or address
        E2BIG = 7,	// Argument list too long
        ENOEXEC = 8,	// Exec format error
        EBADF = 9,	// Bad file number
        ECHILD = 10,	// No child processes
        EAGAIN = 11,	// Try again
        ENOMEM = 12,	// Out of memory
        EACCES = 13,	// Permission denied
        EFAULT = 14,	// Bad address
        ENOTBLK = 15,	// Block device required
        EBUSY = 16,	// Device or resource busy
        EEXIST = 17,	// File exists
        EXDEV = 18,	// Cross-device link
        ENODEV = 19,	// No such device
        ENOTDIR = 20,	// Not a directory
        EISDIR = 21,	// Is a directory
        EINVAL = 22,	// Invalid argument
        ENFILE = 23,	// File table overflow
        EMFILE = 24,	// Too many open files
        ENOTTY = 25,	// Not a typewriter
        ETXTBSY = 26,	// Text file busy
        EFBIG = 27,	// File too large
        ENOSPC = 28,	// No space left on device
        ESPIPE = 29,	// Illegal seek
        EROFS = 30,	// Read-only file system
        EMLINK = 31,	// Too many links
        EPIPE = 32,	// Broken pipe
        EDOM = 33,	// Math argument out of domain of func
        ERANGE = 34,	// Math result not representable
        EDEADLK = 35,	// Resource deadlock would occur
        ENAMETOOLONG = 36,	// File name too long
        ENOLCK = 37,  // No record locks available
        ENOSYS = 38,	// Function not implemented
        ENOTEMPTY = 39,	// Directory not empty
        ELOOP = 40,	// Too many symbolic links encountered
        // EWOULDBLOCK = 11, // Operation would block, returns EAGAIN
        ENOMSG = 42,	// No message of desired type
        EIDRM = 43,	// Identifier removed
        ENOSTR = 60,	// Device not a stream
        ENODATA = 61,	// No data available
        ETIME = 62,	// Timer expired
        ENOSR = 63,	// Out of streams resources
        EREMOTE = 66,	// Object is remote
        ENOLINK = 67,	// Link has been severed
        EPROTO = 71,	// Protocol error
        EMULTIHOP = 72,	// Multihop attempted
        EBADMSG = 74,	// Not a data message
        EOVERFLOW = 75,	// Value too large for defined data type
        EILSEQ = 84,	// Illegal byte sequence
        EUSERS = 87,	// Too many users
        ENOTSOCK = 88,	// Socket operation on non-socket
        EDESTADDRREQ = 89,	// Destination address required
        EMSGSIZE = 90,	// Message too long
        EPROTOTYPE = 91,	// Protocol wrong type for socket
        ENOPROTOOPT = 92,	// Protocol not available
        EPROTONOSUPPORT = 93,	// Protocol not supported
        ESOCKTNOSUPPORT = 94,	// Socket type not supported
        EOPNOTSUPP = 95,	// Operation not supported on transport endpoint
        EPFNOSUPPORT = 96,	// Protocol family not supported
        EAFNOSUPPORT = 97,	// Address family not supported by protocol
        EADDRINUSE = 98,	// Address already in use
        EADDRNOTAVAIL = 99,	// Cannot assign requested address
        ENETDOWN = 100,	// Network is down
        ENETUNREACH = 101,	// Network is unreachable
        ENETRESET = 102,	// Network dropped connection because of reset
        ECONNABORTED = 103,	// Software caused connection abort
        ECONNRESET = 104,	// Connection reset by peer
        ENOBUFS = 105,	// No buffer space available
        EISCONN = 106,	// Transport endpoint is already connected
        ENOTCONN = 107,	// Transport endpoint is not connected
        ESHUTDOWN = 108,	// Cannot send after transport endpoint shutdown
        ETOOMANYREFS = 109,	// Too many references cannot splice
        ETIMEDOUT = 110,	// Connection timed out
        ECONNREFUSED = 111,	// Connection refused
        EHOSTDOWN = 112,	// Host is down
        EHOSTUNREACH = 113,	// No route to host
        EALREADY = 114,	// Operation already in progress
        EINPROGRESS = 115,	// Operation now in progress
        ESTALE = 116,	// Stale NFS file handle
        EDQUOT = 122,	// Quota exceeded
        ECANCELED = 125,	// Operation Canceled
        EOWNERDEAD = 130,	// Owner died
        ENOTRECOVERABLE = 131, // State not recoverable
    }
}

impl Errno {
    /// The raw Linux value, positive.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
