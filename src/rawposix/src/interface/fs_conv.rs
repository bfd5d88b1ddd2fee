use sysdefs::constants::fs_const;
use sysdefs::data::fs_struct::{FSData, StatData};

// These conversion functions are necessary because:
// 1. Host libc structures vary across platforms, while StatData/FSData are the
//    fixed x86_64 Linux layout the emulated process reads.
// 2. Open flag bits are numbered differently on non-Linux hosts.

/// Linux open(2) flag bit -> host flag bit. Bits not listed are dropped.
const OPEN_FLAG_TABLE: &[(i32, libc::c_int)] = &[
    (fs_const::O_CREAT, libc::O_CREAT),
    (fs_const::O_EXCL, libc::O_EXCL),
    (fs_const::O_NOCTTY, libc::O_NOCTTY),
    (fs_const::O_TRUNC, libc::O_TRUNC),
    (fs_const::O_APPEND, libc::O_APPEND),
    (fs_const::O_NONBLOCK, libc::O_NONBLOCK),
    (fs_const::O_DSYNC, libc::O_DSYNC),
    (fs_const::O_DIRECTORY, libc::O_DIRECTORY),
    (fs_const::O_NOFOLLOW, libc::O_NOFOLLOW),
    (fs_const::O_CLOEXEC, libc::O_CLOEXEC),
];

/// Translates Linux open flags into the host's numbering.
pub fn open_flags_to_host(linux: i32) -> libc::c_int {
    let mut host = match linux & fs_const::O_ACCMODE {
        fs_const::O_WRONLY => libc::O_WRONLY,
        fs_const::O_RDWR => libc::O_RDWR,
        _ => libc::O_RDONLY,
    };
    for (linux_bit, host_bit) in OPEN_FLAG_TABLE {
        if linux & linux_bit != 0 {
            host |= host_bit;
        }
    }
    // O_SYNC is O_DSYNC plus one more bit on Linux
    if linux & fs_const::O_SYNC == fs_const::O_SYNC {
        host |= libc::O_SYNC;
    }
    host
}

/// Host file-type bits -> Linux file-type bits. Permission bits are the same
/// everywhere and pass through.
fn mode_to_linux(host_mode: u32) -> u32 {
    let perms = host_mode & 0o7777;
    let kind = match host_mode & libc::S_IFMT as u32 {
        m if m == libc::S_IFDIR as u32 => fs_const::S_IFDIR,
        m if m == libc::S_IFREG as u32 => fs_const::S_IFREG,
        m if m == libc::S_IFLNK as u32 => fs_const::S_IFLNK,
        m if m == libc::S_IFCHR as u32 => fs_const::S_IFCHR,
        m if m == libc::S_IFBLK as u32 => fs_const::S_IFBLK,
        m if m == libc::S_IFIFO as u32 => fs_const::S_IFIFO,
        m if m == libc::S_IFSOCK as u32 => fs_const::S_IFSOCK,
        _ => 0,
    };
    kind | perms
}

/// Copies fields from a host `libc::stat` into the Linux `StatData` layout.
pub fn convert_statdata_to_user(st: &libc::stat) -> StatData {
    StatData {
        st_dev: st.st_dev as u64,
        st_ino: st.st_ino as u64,
        st_nlink: st.st_nlink as u64,
        st_mode: mode_to_linux(st.st_mode as u32),
        st_uid: st.st_uid,
        st_gid: st.st_gid,
        st_rdev: st.st_rdev as u64,
        st_size: st.st_size as i64,
        st_blksize: st.st_blksize as i64,
        st_blocks: st.st_blocks as i64,
        st_atime: st.st_atime as i64,
        st_atime_nsec: st.st_atime_nsec as i64,
        st_mtime: st.st_mtime as i64,
        st_mtime_nsec: st.st_mtime_nsec as i64,
        st_ctime: st.st_ctime as i64,
        st_ctime_nsec: st.st_ctime_nsec as i64,
        ..StatData::default()
    }
}

/// Copies fields from a host `libc::statvfs` into the Linux `FSData` layout.
pub fn convert_fsdata_to_user(sv: &libc::statvfs) -> FSData {
    let fsid = sv.f_fsid as u64;
    FSData {
        // statvfs carries no filesystem magic
        f_type: 0,
        f_bsize: sv.f_bsize as i64,
        f_blocks: sv.f_blocks as u64,
        f_bfree: sv.f_bfree as u64,
        f_bavail: sv.f_bavail as u64,
        f_files: sv.f_files as u64,
        f_ffree: sv.f_ffree as u64,
        f_fsid: [fsid as u32 as i32, (fsid >> 32) as u32 as i32],
        f_namelen: sv.f_namemax as i64,
        f_frsize: sv.f_frsize as i64,
        f_flags: sv.f_flag as i64,
        f_spare: [0; 4],
    }
}
