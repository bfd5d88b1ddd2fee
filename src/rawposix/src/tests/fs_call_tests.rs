// Filesystem handler tests
//
// Handlers are called the way a dispatcher would call them: with a Cage and
// an argument record whose address slots point at test-owned memory.

use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;

use sysdefs::constants::fs_const::{O_CREAT, O_DIRECTORY, O_RDONLY, O_WRONLY, S_IFIFO, R_OK};
use sysdefs::constants::{Errno, UNUSED_ARG};
use sysdefs::data::fs_struct::{FSData, StatData};
use sysdefs::data::sys_struct::TimeVal;

use crate::interface::{ArgSlot, SyscallArgs};
use crate::syscalls::fs_calls::*;
use crate::syscalls::syscall_return;
use crate::tests::*;

fn args(slots: &[ArgSlot]) -> SyscallArgs {
    SyscallArgs::new(slots)
}

// === PATH RESOLUTION ===

/// Test: "/" resolves to the root itself
#[test]
fn test_resolve_root() {
    let (_dir, cage) = scratch_cage();
    let (node, name) = cage.resolve_parent("/").unwrap();
    assert!(std::sync::Arc::ptr_eq(&node, &cage.root));
    assert_eq!(name, ".");
}

/// Test: absolute and relative paths resolve from root and cwd
#[test]
fn test_resolve_relative_to_cwd() {
    let (dir, cage) = scratch_cage();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();

    let (node, name) = cage.resolve_parent("/a//b/").unwrap();
    assert_eq!(node.emulated_path(), "/a");
    assert_eq!(name, "b");

    cage.set_cwd(cage.resolve("/a").unwrap());
    let (node, name) = cage.resolve_parent("b/../b/file").unwrap();
    assert_eq!(node.emulated_path(), "/a/b");
    assert_eq!(name, "file");

    // ".." never climbs above the root
    let node = cage.resolve("/../../a").unwrap();
    assert_eq!(node.resolved_path(), dir.path().join("a"));
    assert_eq!(cage.resolve_parent("").unwrap_err().errno(), Errno::ENOENT);
}

// === HANDLERS ===

/// Test: open a new file, write through the descriptor, close it
#[test]
fn test_open_close() {
    let (dir, cage) = scratch_cage();
    let path = cstr("/created");
    let fd = open_syscall(
        &cage,
        &args(&[path_arg(&path), ArgSlot::from((O_WRONLY | O_CREAT) as i64), ArgSlot::from(0o644u64)]),
    )
    .unwrap() as i32;
    assert!(cage.fds.contains_key(&fd));
    assert!(dir.path().join("created").exists());

    assert_eq!(close_syscall(&cage, &args(&[ArgSlot::from(fd as i64)])).unwrap(), 0);
    assert!(!cage.fds.contains_key(&fd));
    let again = close_syscall(&cage, &args(&[ArgSlot::from(fd as i64)]));
    assert_eq!(again.unwrap_err().errno(), Errno::EBADF);
}

/// Test: a read-only open of a directory yields a directory handle
#[test]
fn test_open_directory_read_only() {
    let (dir, cage) = scratch_cage();
    fs::create_dir(dir.path().join("d")).unwrap();
    let path = cstr("/d");
    let fd = open_syscall(
        &cage,
        &args(&[path_arg(&path), ArgSlot::from((O_RDONLY | O_DIRECTORY) as i64)]),
    )
    .unwrap() as i32;
    let handle = cage.fds.get(&fd).unwrap();
    assert_eq!(handle.node().unwrap().emulated_path(), "/d");
    drop(handle);

    let root = cstr("/");
    assert!(open_syscall(&cage, &args(&[path_arg(&root), ArgSlot::from(O_RDONLY as i64)])).is_ok());

    // writing to a directory is still refused
    let res = open_syscall(&cage, &args(&[path_arg(&path), ArgSlot::from(O_WRONLY as i64)]));
    assert_eq!(res.unwrap_err().errno(), Errno::EISDIR);
}

/// Test: path bytes that aren't UTF-8 reach the host unchanged
#[test]
fn test_non_utf8_paths() {
    let (dir, cage) = scratch_cage();
    fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9")), b"abc").unwrap();

    let file = b"/caf\xe9\0".to_vec();
    let mut st = StatData::default();
    lstat_syscall(&cage, &args(&[path_arg(&file), ptr_arg(&mut st)])).unwrap();
    assert_eq!(st.st_size, 3);

    let sub = b"/d\xff\0".to_vec();
    mkdir_syscall(&cage, &args(&[path_arg(&sub), ArgSlot::from(0o755u64)])).unwrap();
    assert!(dir.path().join(OsStr::from_bytes(b"d\xff")).is_dir());
    chdir_syscall(&cage, &args(&[path_arg(&sub)])).unwrap();
    let mut buf = [0u8; 16];
    let len = getcwd_syscall(&cage, &args(&[ArgSlot::from(buf.as_mut_ptr()), ArgSlot::from(16u64)]))
        .unwrap();
    assert_eq!(&buf[..len as usize], b"/d\xff\0");

    unlink_syscall(&cage, &args(&[path_arg(&file)])).unwrap();
    assert!(!dir.path().join(OsStr::from_bytes(b"caf\xe9")).exists());
}

/// Test: fstat through a file handle and through a directory handle
#[test]
fn test_fstat() {
    let (dir, cage) = scratch_cage();
    fs::write(dir.path().join("f"), b"12345").unwrap();
    let path = cstr("f");
    let fd = open_syscall(&cage, &args(&[path_arg(&path), ArgSlot::from(O_RDONLY as i64)])).unwrap();

    let mut st = StatData::default();
    fstat_syscall(&cage, &args(&[ArgSlot::from(fd), ptr_arg(&mut st)])).unwrap();
    assert_eq!(st.st_size, 5);

    let root = cstr("/");
    let dfd = open_syscall(&cage, &args(&[path_arg(&root), ArgSlot::from(O_RDONLY as i64)])).unwrap();
    fstat_syscall(&cage, &args(&[ArgSlot::from(dfd), ptr_arg(&mut st)])).unwrap();
    assert!(st.is_dir());

    let res = fstat_syscall(&cage, &args(&[ArgSlot::from(12345i64), ptr_arg(&mut st)]));
    assert_eq!(res.unwrap_err().errno(), Errno::EBADF);
}

/// Test: mkdir, lstat, rmdir round through the handlers
#[test]
fn test_mkdir_lstat_rmdir() {
    let (dir, cage) = scratch_cage();
    let path = cstr("/newdir");
    mkdir_syscall(&cage, &args(&[path_arg(&path), ArgSlot::from(0o755u64)])).unwrap();
    assert!(dir.path().join("newdir").is_dir());

    let mut st = StatData::default();
    lstat_syscall(&cage, &args(&[path_arg(&path), ptr_arg(&mut st)])).unwrap();
    assert!(st.is_dir());

    rmdir_syscall(&cage, &args(&[path_arg(&path)])).unwrap();
    assert!(!dir.path().join("newdir").exists());

    let res = lstat_syscall(&cage, &args(&[path_arg(&path), ptr_arg(&mut st)]));
    assert_eq!(res.unwrap_err().errno(), Errno::ENOENT);
}

/// Test: statfs on a directory and on a regular file
#[test]
fn test_statfs() {
    let (dir, cage) = scratch_cage();
    fs::write(dir.path().join("f"), b"").unwrap();
    let mut buf = FSData::default();
    let root = cstr("/");
    statfs_syscall(&cage, &args(&[path_arg(&root), ptr_arg(&mut buf)])).unwrap();
    assert!(buf.f_bsize > 0);

    let file = cstr("/f");
    let mut buf2 = FSData::default();
    statfs_syscall(&cage, &args(&[path_arg(&file), ptr_arg(&mut buf2)])).unwrap();
    assert_eq!(buf.f_fsid, buf2.f_fsid);

    let missing = cstr("/missing");
    let res = statfs_syscall(&cage, &args(&[path_arg(&missing), ptr_arg(&mut buf)]));
    assert_eq!(res.unwrap_err().errno(), Errno::ENOENT);
}

/// Test: rename, link and unlink through the handlers
#[test]
fn test_rename_link_unlink() {
    let (dir, cage) = scratch_cage();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("f"), b"x").unwrap();

    let f = cstr("/f");
    let g = cstr("/sub/g");
    rename_syscall(&cage, &args(&[path_arg(&f), path_arg(&g)])).unwrap();
    assert!(dir.path().join("sub/g").exists());

    let h = cstr("/h");
    link_syscall(&cage, &args(&[path_arg(&g), path_arg(&h)])).unwrap();
    assert_eq!(fs::read(dir.path().join("h")).unwrap(), b"x");

    unlink_syscall(&cage, &args(&[path_arg(&h)])).unwrap();
    assert!(!dir.path().join("h").exists());

    let root = cstr("/");
    let res = rename_syscall(&cage, &args(&[path_arg(&root), path_arg(&h)]));
    assert_eq!(res.unwrap_err().errno(), Errno::EINVAL);
}

/// Test: symlink and readlink, including truncation to the buffer size
#[test]
fn test_symlink_readlink() {
    let (_dir, cage) = scratch_cage();
    let target = cstr("a/long/target");
    let link = cstr("/l");
    symlink_syscall(&cage, &args(&[path_arg(&target), path_arg(&link)])).unwrap();

    let mut buf = vec![0u8; 64];
    let n = readlink_syscall(
        &cage,
        &args(&[path_arg(&link), ArgSlot::from(buf.as_mut_ptr()), ArgSlot::from(buf.len() as u64)]),
    )
    .unwrap();
    assert_eq!(&buf[..n as usize], b"a/long/target");

    let mut small = [0u8; 4];
    let n = readlink_syscall(
        &cage,
        &args(&[path_arg(&link), ArgSlot::from(small.as_mut_ptr()), ArgSlot::from(4u64)]),
    )
    .unwrap();
    assert_eq!(n, 4);
    assert_eq!(&small, b"a/lo");

    let res = readlink_syscall(
        &cage,
        &args(&[path_arg(&link), ArgSlot::from(small.as_mut_ptr()), ArgSlot::from(0u64)]),
    );
    assert_eq!(res.unwrap_err().errno(), Errno::EINVAL);
}

/// Test: chmod, chown, access, mknod and utimes through the handlers
#[test]
fn test_attribute_handlers() {
    let (dir, cage) = scratch_cage();
    let p = cstr("/p");
    mknod_syscall(&cage, &args(&[path_arg(&p), ArgSlot::from((S_IFIFO | 0o644) as u64), ArgSlot::from(0u64)]))
        .unwrap();

    chmod_syscall(&cage, &args(&[path_arg(&p), ArgSlot::from(0o600u64)])).unwrap();
    let mut st = StatData::default();
    lstat_syscall(&cage, &args(&[path_arg(&p), ptr_arg(&mut st)])).unwrap();
    assert_eq!(st.st_mode & 0o777, 0o600);
    assert_eq!(st.file_type(), S_IFIFO);

    chown_syscall(
        &cage,
        &args(&[path_arg(&p), ArgSlot::from(st.st_uid as u64), ArgSlot::from(st.st_gid as u64)]),
    )
    .unwrap();

    assert_eq!(access_syscall(&cage, &args(&[path_arg(&p), ArgSlot::from(R_OK as i64)])).unwrap(), 0);

    let mut times = [
        TimeVal {
            tv_sec: 1_500_000_000,
            tv_usec: 0,
        },
        TimeVal {
            tv_sec: 1_500_000_000,
            tv_usec: 0,
        },
    ];
    utimes_syscall(&cage, &args(&[path_arg(&p), ptr_arg(&mut times)])).unwrap();
    lstat_syscall(&cage, &args(&[path_arg(&p), ptr_arg(&mut st)])).unwrap();
    assert_eq!(st.st_mtime, 1_500_000_000);

    utimes_syscall(&cage, &args(&[path_arg(&p), ArgSlot::default()])).unwrap();
    assert!(dir.path().join("p").exists());
}

/// Test: chdir moves only the cage's view, getcwd reports it
#[test]
fn test_chdir_getcwd() {
    let (dir, cage) = scratch_cage();
    fs::create_dir_all(dir.path().join("x/y")).unwrap();
    let path = cstr("/x/y");
    chdir_syscall(&cage, &args(&[path_arg(&path)])).unwrap();

    let mut buf = vec![0u8; 32];
    let len = getcwd_syscall(&cage, &args(&[ArgSlot::from(buf.as_mut_ptr()), ArgSlot::from(32u64)])).unwrap();
    assert_eq!(len, 5);
    assert_eq!(&buf[..5], b"/x/y\0");

    let mut tiny = [0u8; 4];
    let res = getcwd_syscall(&cage, &args(&[ArgSlot::from(tiny.as_mut_ptr()), ArgSlot::from(4u64)]));
    assert_eq!(res.unwrap_err().errno(), Errno::ERANGE);

    // relative paths now start from /x/y
    let rel = cstr("rel");
    mkdir_syscall(&cage, &args(&[path_arg(&rel), ArgSlot::from(0o755u64)])).unwrap();
    assert!(dir.path().join("x/y/rel").is_dir());

    let up = cstr("..");
    chdir_syscall(&cage, &args(&[path_arg(&up)])).unwrap();
    assert_eq!(cage.cwd().emulated_path(), "/x");
}

/// Test: pointer and path argument faults
#[test]
fn test_argument_faults() {
    let (_dir, cage) = scratch_cage();
    let res = mkdir_syscall(&cage, &args(&[ArgSlot::default(), ArgSlot::from(0o755u64)]));
    assert_eq!(res.unwrap_err().errno(), Errno::EFAULT);

    let path = cstr("/");
    let res = lstat_syscall(&cage, &args(&[path_arg(&path), ArgSlot::default()]));
    assert_eq!(res.unwrap_err().errno(), Errno::EFAULT);

    let long = cstr(&"a".repeat(5000));
    let res = mkdir_syscall(&cage, &args(&[path_arg(&long), ArgSlot::from(0o755u64)]));
    assert_eq!(res.unwrap_err().errno(), Errno::ENAMETOOLONG);
}

/// Test: unused slots are ignored, and failures become -errno at the boundary
#[test]
fn test_syscall_return_convention() {
    let (_dir, cage) = scratch_cage();
    let path = cstr("/missing/dir");
    let raw = SyscallArgs::from_raw([
        path.as_ptr() as u64,
        0o755,
        UNUSED_ARG,
        UNUSED_ARG,
        UNUSED_ARG,
        UNUSED_ARG,
    ]);
    let ret = syscall_return("mkdir", mkdir_syscall(&cage, &raw));
    assert_eq!(ret, -(Errno::ENOENT as i64));

    let ok = cstr("/present");
    let raw = SyscallArgs::from_raw([ok.as_ptr() as u64, 0o755, UNUSED_ARG, UNUSED_ARG, UNUSED_ARG, UNUSED_ARG]);
    assert_eq!(syscall_return("mkdir", mkdir_syscall(&cage, &raw)), 0);
}
