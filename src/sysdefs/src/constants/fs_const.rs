#![allow(dead_code)]

// Linux values. Host values for the same names live in `libc` and may differ;
// translation happens in rawposix, never here.

// ===== Standard File Descriptors =====
pub const STDIN_FILENO: i32 = 0; // File descriptor for standard input
pub const STDOUT_FILENO: i32 = 1; // File descriptor for standard output
pub const STDERR_FILENO: i32 = 2; // File descriptor for standard error

// ===== File Access Permission Flags =====
// Source: include/uapi/linux/fcntl.h (access(2))
pub const F_OK: i32 = 0; // Test for existence
pub const X_OK: i32 = 1; // Test for execute permission
pub const W_OK: i32 = 2; // Test for write permission
pub const R_OK: i32 = 4; // Test for read permission

// ===== File Access Modes =====
// Source: include/uapi/asm-generic/fcntl.h
pub const O_RDONLY: i32 = 0o0; // Open read-only
pub const O_WRONLY: i32 = 0o1; // Open write-only
pub const O_RDWR: i32 = 0o2; // Open read-write
pub const O_ACCMODE: i32 = 0o3; // Mask for access modes

// ===== File Creation and Status Flags =====
// Source: include/uapi/asm-generic/fcntl.h
pub const O_CREAT: i32 = 0o100; // Create file if it doesn't exist
pub const O_EXCL: i32 = 0o200; // Error if O_CREAT and file exists
pub const O_NOCTTY: i32 = 0o400; // Don't assign controlling terminal
pub const O_TRUNC: i32 = 0o1000; // Truncate file to zero length
pub const O_APPEND: i32 = 0o2000; // Append mode - writes always at end
pub const O_NONBLOCK: i32 = 0o4000; // Non-blocking mode
pub const O_DSYNC: i32 = 0o10000; // Synchronized data writes
pub const O_DIRECTORY: i32 = 0o200000; // Fail unless a directory
pub const O_NOFOLLOW: i32 = 0o400000; // Don't follow a trailing symlink
pub const O_CLOEXEC: i32 = 0o2000000; // Close on exec
pub const O_SYNC: i32 = 0o4010000; // Synchronous writes (includes O_DSYNC)

// ===== File Types =====
// Source: include/uapi/linux/stat.h
pub const S_IFMT: u32 = 0o170000;
pub const S_IFSOCK: u32 = 0o140000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFIFO: u32 = 0o010000;

// ===== File Permissions =====
// Source: include/uapi/linux/stat.h
pub const S_IRWXA: u32 = 0o777; // All permissions for all users
pub const S_IRWXU: u32 = 0o700; // User read, write, execute
pub const S_IRUSR: u32 = 0o400; // User read
pub const S_IWUSR: u32 = 0o200; // User write
pub const S_IXUSR: u32 = 0o100; // User execute
pub const S_IRWXG: u32 = 0o070; // Group read, write, execute
pub const S_IRWXO: u32 = 0o007; // Others read, write, execute
