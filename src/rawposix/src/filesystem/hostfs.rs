//! Host directory backend.
//!
//! Almost every operation here is relative to the directory: the host
//! working directory is pointed at it under the global lock and the host
//! call is issued with the bare name. `statfs`, `open_directory` and the
//! destination side of `rename`/`link` use absolute paths instead.
use std::ffi::{CStr, CString, OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sysdefs::constants::{Errno, PATH_MAX};
use sysdefs::data::fs_struct::{FSData, StatData};
use sysdefs::data::sys_struct::TimeVal;

use super::{Backend, VfsNode};
use crate::interface::{
    check, check_size, convert_fsdata_to_user, convert_statdata_to_user, get_errno, host_error,
    lock_cwd, open_flags_to_host, set_errno, set_host_cwd, syscall_error, CwdGuard, RealFd,
    SysResult, SyscallError,
};

#[derive(Debug)]
pub struct HostDir {
    path: PathBuf,
    cpath: CString,
}

fn c_name(name: impl AsRef<OsStr>, call: &'static str) -> SysResult<CString> {
    CString::new(name.as_ref().as_bytes()).map_err(|_| syscall_error(Errno::EINVAL, call))
}

fn c_path(path: &Path, call: &'static str) -> SysResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| syscall_error(Errno::EINVAL, call))
}

/// A text-busy unlink counts as done; anything else is a real failure.
pub(crate) fn tolerate_unlink_failure(err: SyscallError) -> SysResult<()> {
    match err {
        SyscallError::Host {
            errno: Errno::ETXTBSY,
            ..
        } => {
            tracing::debug!("unlink: ignoring ETXTBSY");
            Ok(())
        }
        other => Err(other),
    }
}

impl HostDir {
    /// Checks that `path` is a directory that could be entered, without
    /// entering it.
    pub fn probe(path: PathBuf) -> SysResult<HostDir> {
        let cpath = c_path(&path, "probe")?;
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        check(unsafe { libc::stat(cpath.as_ptr(), &mut st) }, "probe")?;
        if (st.st_mode & libc::S_IFMT) != libc::S_IFDIR {
            return Err(syscall_error(Errno::ENOTDIR, "probe"));
        }
        check(unsafe { libc::access(cpath.as_ptr(), libc::X_OK) }, "probe")?;
        Ok(HostDir { path, cpath })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Takes the global lock and moves the host cwd here. The cwd stays put
    /// for as long as the returned guard lives.
    pub fn scope(&self) -> SysResult<CwdGuard> {
        let guard = lock_cwd();
        set_host_cwd(&guard, &self.cpath)?;
        tracing::trace!(dir = %self.path.display(), "scoped");
        Ok(guard)
    }

    /// Like [`scope`](Self::scope), but first rejects names that can't be
    /// acted on: `""` is `ENOENT`, `.` and `..` are `sentinel`.
    pub fn scope_name(
        &self,
        name: &OsStr,
        sentinel: Errno,
        call: &'static str,
    ) -> SysResult<(CwdGuard, CString)> {
        if name.is_empty() {
            return Err(syscall_error(Errno::ENOENT, call));
        }
        if name == "." || name == ".." {
            return Err(syscall_error(sentinel, call));
        }
        let cname = c_name(name, call)?;
        let guard = self.scope()?;
        Ok((guard, cname))
    }

    pub(super) fn child(&self, parent: &Arc<VfsNode>, name: &OsStr) -> SysResult<Arc<VfsNode>> {
        let dir = HostDir::probe(self.path.join(name))?;
        tracing::debug!(path = %dir.path.display(), "vfs node created");
        Ok(VfsNode::new_child(parent, name, Backend::Host(dir)))
    }

    pub fn stat(&self, name: &OsStr) -> SysResult<StatData> {
        let cname = c_name(name, "stat")?;
        let _cwd = self.scope()?;
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        check(unsafe { libc::lstat(cname.as_ptr(), &mut st) }, "stat")?;
        Ok(convert_statdata_to_user(&st))
    }

    pub fn statfs(&self) -> SysResult<FSData> {
        let mut sv: libc::statvfs = unsafe { std::mem::zeroed() };
        check(unsafe { libc::statvfs(self.cpath.as_ptr(), &mut sv) }, "statfs")?;
        Ok(convert_fsdata_to_user(&sv))
    }

    pub(super) fn open_directory(&self, node: &Arc<VfsNode>) -> SysResult<RealFd> {
        let fd = check(
            unsafe { libc::open(self.cpath.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY) },
            "open",
        )?;
        Ok(RealFd::new(fd, Some(Arc::clone(node))))
    }

    pub fn open_file(&self, name: &OsStr, flags: i32, mode: u32) -> SysResult<RealFd> {
        let (_cwd, cname) = self.scope_name(name, Errno::EISDIR, "open")?;
        // Directories only open through their own node. A failed stat just
        // means there is nothing there yet; open reports the real error.
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::stat(cname.as_ptr(), &mut st) } == 0
            && (st.st_mode & libc::S_IFMT) == libc::S_IFDIR
        {
            return Err(syscall_error(Errno::EISDIR, "open"));
        }
        let fd = check(
            unsafe {
                libc::open(
                    cname.as_ptr(),
                    open_flags_to_host(flags),
                    mode as libc::c_uint,
                )
            },
            "open",
        )?;
        tracing::trace!(?name, fd, "opened");
        Ok(RealFd::new(fd, None))
    }

    pub fn enumerate(&self) -> SysResult<Vec<OsString>> {
        let dot = c_name(".", "enumerate")?;
        let _cwd = self.scope()?;
        let dirp = unsafe { libc::opendir(dot.as_ptr()) };
        if dirp.is_null() {
            return Err(host_error("enumerate"));
        }
        // readdir signals both the end and a failure with null; only errno
        // tells them apart.
        let mut names = Vec::new();
        let mut failed = None;
        loop {
            set_errno(0);
            let entry = unsafe { libc::readdir(dirp) };
            if entry.is_null() {
                if get_errno() != 0 {
                    failed = Some(host_error("enumerate"));
                }
                break;
            }
            let raw = unsafe { CStr::from_ptr((*entry).d_name.as_ptr()) };
            names.push(OsString::from_vec(raw.to_bytes().to_vec()));
        }
        let closed = check(unsafe { libc::closedir(dirp) }, "enumerate");
        if let Some(err) = failed {
            return Err(err);
        }
        closed?;
        Ok(names)
    }

    pub fn read_link(&self, name: &OsStr) -> SysResult<OsString> {
        let (_cwd, cname) = self.scope_name(name, Errno::EINVAL, "readlink")?;
        let mut buf = vec![0u8; PATH_MAX];
        let len = check_size(
            unsafe {
                libc::readlink(
                    cname.as_ptr(),
                    buf.as_mut_ptr() as *mut libc::c_char,
                    buf.len(),
                )
            },
            "readlink",
        )?;
        buf.truncate(len);
        Ok(OsString::from_vec(buf))
    }

    pub fn mkdir(&self, name: &OsStr, mode: u32) -> SysResult<()> {
        let (_cwd, cname) = self.scope_name(name, Errno::EEXIST, "mkdir")?;
        check(unsafe { libc::mkdir(cname.as_ptr(), mode as libc::mode_t) }, "mkdir")?;
        Ok(())
    }

    pub fn rmdir(&self, name: &OsStr) -> SysResult<()> {
        let (_cwd, cname) = self.scope_name(name, Errno::EINVAL, "rmdir")?;
        check(unsafe { libc::rmdir(cname.as_ptr()) }, "rmdir")?;
        Ok(())
    }

    pub fn mknod(&self, name: &OsStr, mode: u32, dev: u64) -> SysResult<()> {
        let (_cwd, cname) = self.scope_name(name, Errno::EINVAL, "mknod")?;
        check(
            unsafe { libc::mknod(cname.as_ptr(), mode as libc::mode_t, dev as libc::dev_t) },
            "mknod",
        )?;
        Ok(())
    }

    pub fn access(&self, name: &OsStr, mode: i32) -> SysResult<i32> {
        let cname = c_name(if name.is_empty() { OsStr::new(".") } else { name }, "access")?;
        let _cwd = self.scope()?;
        check(unsafe { libc::access(cname.as_ptr(), mode) }, "access")
    }

    pub fn chmod(&self, name: &OsStr, mode: u32) -> SysResult<()> {
        let cname = c_name(name, "chmod")?;
        let _cwd = self.scope()?;
        check(unsafe { libc::chmod(cname.as_ptr(), mode as libc::mode_t) }, "chmod")?;
        Ok(())
    }

    pub fn chown(&self, name: &OsStr, owner: u32, group: u32, fake_root: bool) -> SysResult<()> {
        let cname = c_name(name, "chown")?;
        let _cwd = self.scope()?;
        if fake_root {
            tracing::trace!(?name, owner, group, "chown skipped under fake root");
            return Ok(());
        }
        check(
            unsafe { libc::chown(cname.as_ptr(), owner as libc::uid_t, group as libc::gid_t) },
            "chown",
        )?;
        Ok(())
    }

    pub fn symlink(&self, name: &OsStr, target: &OsStr) -> SysResult<()> {
        let ctarget = c_name(target, "symlink")?;
        let (_cwd, cname) = self.scope_name(name, Errno::EINVAL, "symlink")?;
        check(unsafe { libc::symlink(ctarget.as_ptr(), cname.as_ptr()) }, "symlink")?;
        Ok(())
    }

    pub fn utimes(&self, name: &OsStr, times: Option<&[TimeVal; 2]>) -> SysResult<()> {
        let cname = c_name(name, "utimes")?;
        // TimeVal is layout-identical to the host timeval
        let tptr = match times {
            Some(t) => t.as_ptr() as *const libc::timeval,
            None => std::ptr::null(),
        };
        let _cwd = self.scope()?;
        check(unsafe { libc::utimes(cname.as_ptr(), tptr) }, "utimes")?;
        Ok(())
    }

    /// `from` is relative to this directory, `to` to `dest`. The lock is held
    /// from before the destination path is built until the host call returns.
    pub fn rename(&self, from: &OsStr, dest: &HostDir, to: &OsStr) -> SysResult<()> {
        let _held = lock_cwd();
        let cfrom = c_name(from, "rename")?;
        let to_abs = c_path(&dest.path.join(to), "rename")?;
        let _cwd = self.scope()?;
        tracing::debug!(
            ?from,
            src = %self.path.display(),
            to = %dest.path.join(to).display(),
            "rename"
        );
        check(unsafe { libc::rename(cfrom.as_ptr(), to_abs.as_ptr()) }, "rename")?;
        Ok(())
    }

    /// Creates `name` here as a new hard link to `target` in `existing`.
    pub fn link(&self, name: &OsStr, existing: &HostDir, target: &OsStr) -> SysResult<()> {
        let _held = lock_cwd();
        let cname = c_name(name, "link")?;
        let target_abs = c_path(&existing.path.join(target), "link")?;
        let _cwd = self.scope()?;
        tracing::debug!(
            ?name,
            dir = %self.path.display(),
            target = %existing.path.join(target).display(),
            "link"
        );
        check(unsafe { libc::link(target_abs.as_ptr(), cname.as_ptr()) }, "link")?;
        Ok(())
    }

    pub fn unlink(&self, name: &OsStr) -> SysResult<()> {
        let (_cwd, cname) = self.scope_name(name, Errno::EISDIR, "unlink")?;
        match check(unsafe { libc::unlink(cname.as_ptr()) }, "unlink") {
            Ok(_) => Ok(()),
            Err(err) => tolerate_unlink_failure(err),
        }
    }
}
