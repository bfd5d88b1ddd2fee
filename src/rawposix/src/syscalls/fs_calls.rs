//! Filesystem syscall handlers
//!
//! Every handler decodes its argument record, resolves Linux paths against
//! the cage's root and cwd, and hands the last path component to a node
//! operation. No handler talks to the host directly; the node does that.
use std::os::unix::ffi::OsStrExt;

use sysdefs::constants::fs_const::{O_ACCMODE, O_CREAT, O_RDONLY};
use sysdefs::constants::Errno;
use sysdefs::data::fs_struct::{FSData, StatData};
use sysdefs::data::sys_struct::TimeVal;

use crate::cage::Cage;
use crate::interface::{syscall_error, SysResult, SyscallArgs};

/// Reference to Linux: https://man7.org/linux/man-pages/man2/open.2.html
///
/// Regular files (and anything else that isn't a directory) are opened by
/// name inside their parent node. A directory can't be opened that way, so a
/// read-only open of one walks into it and opens the node itself instead.
///
/// ## Arguments:
/// - path: pathname, user's perspective.
/// - flags: Linux open flags, translated for the host by the node.
/// - mode: permission bits for a newly created file.
///
/// ## Returns:
/// the host descriptor now owned by the cage
pub fn open_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("open")?;
    let flags = args.arg(1).s32();
    let mode = args.arg(2).u32();

    let (parent, name) = cage.resolve_parent(path)?;
    let handle = match parent.open_file(&name, flags, mode) {
        Ok(handle) => handle,
        Err(err)
            if err.errno() == Errno::EISDIR
                && flags & O_ACCMODE == O_RDONLY
                && flags & O_CREAT == 0 =>
        {
            parent.traverse(&name)?.open_directory()?
        }
        Err(err) => return Err(err),
    };
    Ok(cage.insert_fd(handle) as i64)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/close.2.html
///
/// Removing the handle from the table drops it, and dropping closes it.
pub fn close_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let fd = args.arg(0).s32();
    match cage.fds.remove(&fd) {
        Some(_) => Ok(0),
        None => Err(syscall_error(Errno::EBADF, "close")),
    }
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/fstat.2.html
pub fn fstat_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let fd = args.arg(0).s32();
    let buf = args.arg(1).as_struct_mut::<StatData>("fstat")?;
    let stat = match cage.fds.get(&fd) {
        Some(handle) => handle.fstat()?,
        None => return Err(syscall_error(Errno::EBADF, "fstat")),
    };
    *buf = stat;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/lstat.2.html
///
/// A final symlink is reported on, not followed.
pub fn lstat_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("lstat")?;
    let buf = args.arg(1).as_struct_mut::<StatData>("lstat")?;
    let (parent, name) = cage.resolve_parent(path)?;
    *buf = parent.stat(&name)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/statfs.2.html
///
/// For a path that names a non-directory the containing directory's
/// filesystem is reported.
pub fn statfs_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("statfs")?;
    let buf = args.arg(1).as_struct_mut::<FSData>("statfs")?;
    let (parent, name) = cage.resolve_parent(path)?;
    let node = match parent.traverse(&name) {
        Ok(node) => node,
        Err(err) if err.errno() == Errno::ENOTDIR => {
            parent.stat(&name)?;
            parent
        }
        Err(err) => return Err(err),
    };
    *buf = node.statfs()?;
    Ok(0)
}

pub fn mkdir_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("mkdir")?;
    let mode = args.arg(1).u32();
    let (parent, name) = cage.resolve_parent(path)?;
    parent.mkdir(&name, mode)?;
    Ok(0)
}

pub fn rmdir_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("rmdir")?;
    let (parent, name) = cage.resolve_parent(path)?;
    parent.rmdir(&name)?;
    Ok(0)
}

pub fn unlink_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("unlink")?;
    let (parent, name) = cage.resolve_parent(path)?;
    parent.unlink(&name)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/rename.2.html
pub fn rename_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let oldpath = args.arg(0).as_path("rename")?;
    let newpath = args.arg(1).as_path("rename")?;
    let (old_parent, old_name) = cage.resolve_parent(oldpath)?;
    let (new_parent, new_name) = cage.resolve_parent(newpath)?;
    old_parent.rename(&old_name, &new_parent, &new_name)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/link.2.html
///
/// `newpath` becomes another name for the file at `oldpath`.
pub fn link_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let oldpath = args.arg(0).as_path("link")?;
    let newpath = args.arg(1).as_path("link")?;
    let (old_parent, old_name) = cage.resolve_parent(oldpath)?;
    let (new_parent, new_name) = cage.resolve_parent(newpath)?;
    new_parent.link(&new_name, &old_parent, &old_name)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/symlink.2.html
///
/// The target is stored verbatim and never resolved here.
pub fn symlink_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let target = args.arg(0).as_path("symlink")?;
    let linkpath = args.arg(1).as_path("symlink")?;
    let (parent, name) = cage.resolve_parent(linkpath)?;
    parent.symlink(&name, target)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/readlink.2.html
///
/// ## Returns:
/// number of bytes placed in the buffer, which is never NUL-terminated and
/// is silently truncated to `bufsiz`
pub fn readlink_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("readlink")?;
    let bufsiz = args.arg(2).u() as usize;
    if bufsiz == 0 {
        return Err(syscall_error(Errno::EINVAL, "readlink"));
    }
    let (parent, name) = cage.resolve_parent(path)?;
    let contents = parent.read_link(&name)?;
    let bytes = contents.as_bytes();
    let len = bytes.len().min(bufsiz);
    let buf = args.arg(1).as_buf(len, "readlink")?;
    buf.copy_from_slice(&bytes[..len]);
    Ok(len as i64)
}

pub fn chmod_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("chmod")?;
    let mode = args.arg(1).u32();
    let (parent, name) = cage.resolve_parent(path)?;
    parent.chmod(&name, mode)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/chown.2.html
///
/// Under a fake-root configuration this succeeds without changing anything.
pub fn chown_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("chown")?;
    let owner = args.arg(1).u32();
    let group = args.arg(2).u32();
    let (parent, name) = cage.resolve_parent(path)?;
    parent.chown(&name, owner, group)?;
    Ok(0)
}

pub fn access_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("access")?;
    let mode = args.arg(1).s32();
    let (parent, name) = cage.resolve_parent(path)?;
    Ok(parent.access(&name, mode)? as i64)
}

pub fn mknod_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("mknod")?;
    let mode = args.arg(1).u32();
    let dev = args.arg(2).u();
    let (parent, name) = cage.resolve_parent(path)?;
    parent.mknod(&name, mode, dev)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/utimes.2.html
///
/// A null `times` sets both timestamps to the current time.
pub fn utimes_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("utimes")?;
    let times = if args.arg(1).is_null() {
        None
    } else {
        Some(args.arg(1).as_struct::<[TimeVal; 2]>("utimes")?)
    };
    let (parent, name) = cage.resolve_parent(path)?;
    parent.utimes(&name, times)?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/chdir.2.html
///
/// Only the cage's view changes; the host cwd belongs to whichever scoped
/// operation is running.
pub fn chdir_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let path = args.arg(0).as_path("chdir")?;
    let node = cage.resolve(path)?;
    cage.set_cwd(node);
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/getcwd.2.html
///
/// ## Returns:
/// length of the path including its NUL, the raw syscall's convention
pub fn getcwd_syscall(cage: &Cage, args: &SyscallArgs) -> SysResult<i64> {
    let size = args.arg(1).u() as usize;
    let cwd = cage.cwd().emulated_path();
    let len = cwd.len() + 1;
    if size < len {
        return Err(syscall_error(Errno::ERANGE, "getcwd"));
    }
    let buf = args.arg(0).as_buf(len, "getcwd")?;
    buf[..cwd.len()].copy_from_slice(cwd.as_bytes());
    buf[cwd.len()] = 0;
    Ok(len as i64)
}
