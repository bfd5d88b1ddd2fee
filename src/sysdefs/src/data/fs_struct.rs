//! Filesystem structures in the layout the emulated (x86_64 Linux) process expects.
//!
//! Unlike the time structures these are not assumed to match the host: host
//! `stat`/`statvfs` layouts vary too much across platforms, so rawposix
//! fills these field by field.
#![allow(dead_code)]

//derive eq attributes for testing whether the structs equal other statdata structs from stat/fstat
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct StatData {
    pub st_dev: u64,
    pub st_ino: u64,
    pub st_nlink: u64,
    pub st_mode: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub __pad0: i32,
    pub st_rdev: u64,
    pub st_size: i64,
    pub st_blksize: i64,
    pub st_blocks: i64,
    pub st_atime: i64,
    pub st_atime_nsec: i64,
    pub st_mtime: i64,
    pub st_mtime_nsec: i64,
    pub st_ctime: i64,
    pub st_ctime_nsec: i64,
    pub __unused: [i64; 3],
}

impl StatData {
    /// File type bits of `st_mode`, in Linux numbering.
    pub fn file_type(&self) -> u32 {
        self.st_mode & crate::constants::S_IFMT
    }

    pub fn is_dir(&self) -> bool {
        self.file_type() == crate::constants::S_IFDIR
    }
}

// struct statfs
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct FSData {
    pub f_type: i64,
    pub f_bsize: i64,
    pub f_blocks: u64,
    pub f_bfree: u64,
    pub f_bavail: u64,
    pub f_files: u64,
    pub f_ffree: u64,
    pub f_fsid: [i32; 2],
    pub f_namelen: i64,
    pub f_frsize: i64,
    pub f_flags: i64,
    pub f_spare: [i64; 4],
}

pub const STATDATA_SIZE: usize = std::mem::size_of::<StatData>();
pub const FSDATA_SIZE: usize = std::mem::size_of::<FSData>();

const _: () = assert!(STATDATA_SIZE == 144);
const _: () = assert!(FSDATA_SIZE == 120);
