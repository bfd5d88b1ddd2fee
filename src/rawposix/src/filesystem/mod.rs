//! The filesystem virtualization node.
//!
//! A [`VfsNode`] stands for one directory in the emulated namespace. Nodes
//! form a tree through their parent references: a child is created on
//! demand by [`VfsNode::traverse`] and dropped when nothing refers to it any
//! more. There is no node cache, so walking to the same directory twice may
//! well produce two distinct nodes for it.
//!
//! Every path-based operation takes a *name* relative to the node. `.` and
//! `..` never create a node: they resolve to the node itself and to its
//! parent. The root node is its own parent.
//!
//! The concrete work is done by a backend. Backends form a closed set
//! ([`Backend`]); today there is only the host directory backend in
//! [`hostfs`].
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::Arc;

use sysdefs::constants::Errno;
use sysdefs::data::fs_struct::{FSData, StatData};
use sysdefs::data::sys_struct::TimeVal;

use crate::interface::{syscall_error, RealFd, SysResult, SyscallError, VfsConfig};

pub mod hostfs;

pub use hostfs::HostDir;

/// The backends a node may be served by.
#[derive(Debug)]
pub enum Backend {
    /// A directory on the host filesystem, addressed by absolute path.
    Host(HostDir),
}

#[derive(Debug)]
pub struct VfsNode {
    // None only for a root node; a root answers ".." with itself.
    parent: Option<Arc<VfsNode>>,
    name: OsString,
    config: Arc<VfsConfig>,
    backend: Backend,
}

/// `.`, `..` and the empty name can't denote a distinct entry to create or
/// rename.
fn is_special_name(name: &OsStr) -> bool {
    name.is_empty() || name == "." || name == ".."
}

impl VfsNode {
    /// Builds a root node over an absolute host directory.
    pub fn new_root(path: impl AsRef<Path>, config: Arc<VfsConfig>) -> SysResult<Arc<VfsNode>> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(syscall_error(Errno::EINVAL, "new_root"));
        }
        let dir = HostDir::probe(path.to_path_buf())?;
        tracing::debug!(path = %path.display(), "vfs root created");
        Ok(Arc::new(VfsNode {
            parent: None,
            name: OsString::new(),
            config,
            backend: Backend::Host(dir),
        }))
    }

    pub(crate) fn new_child(parent: &Arc<VfsNode>, name: &OsStr, backend: Backend) -> Arc<VfsNode> {
        Arc::new(VfsNode {
            parent: Some(Arc::clone(parent)),
            name: name.to_os_string(),
            config: Arc::clone(&parent.config),
            backend,
        })
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn config(&self) -> &VfsConfig {
        &self.config
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// The parent node; a root is its own parent.
    pub fn parent(self: &Arc<Self>) -> Arc<VfsNode> {
        match &self.parent {
            Some(parent) => Arc::clone(parent),
            None => Arc::clone(self),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Absolute host path this node resolves to.
    pub fn resolved_path(&self) -> &Path {
        match &self.backend {
            Backend::Host(dir) => dir.path(),
        }
    }

    /// The node's path as the emulated process sees it, built from the
    /// names on the way up to the root.
    pub fn emulated_path(&self) -> OsString {
        let mut names = Vec::new();
        let mut cur = self;
        while let Some(parent) = &cur.parent {
            names.push(cur.name.as_os_str());
            cur = parent;
        }
        if names.is_empty() {
            return OsString::from("/");
        }
        names.iter().rev().fold(OsString::new(), |mut acc, n| {
            acc.push("/");
            acc.push(n);
            acc
        })
    }

    /// Capability check for cross-node operations that need the other side to
    /// be a host directory.
    pub fn as_host(&self, call: &'static str) -> SysResult<&HostDir> {
        match &self.backend {
            Backend::Host(dir) => Ok(dir),
            #[allow(unreachable_patterns)]
            _ => Err(SyscallError::BackendMismatch { call }),
        }
    }

    /// Status of `name` without following a final symlink. `..` is answered
    /// by the parent's `.`.
    pub fn stat(self: &Arc<Self>, name: impl AsRef<OsStr>) -> SysResult<StatData> {
        let name = name.as_ref();
        if name == ".." {
            return self.parent().stat(".");
        }
        match &self.backend {
            Backend::Host(dir) => dir.stat(name),
        }
    }

    pub fn statfs(&self) -> SysResult<FSData> {
        match &self.backend {
            Backend::Host(dir) => dir.statfs(),
        }
    }

    /// Walks one component. `.` and `""` give this node back, `..` gives the
    /// parent, anything else builds (and probes) a fresh child.
    pub fn traverse(self: &Arc<Self>, name: impl AsRef<OsStr>) -> SysResult<Arc<VfsNode>> {
        let name = name.as_ref();
        if name.is_empty() || name == "." {
            return Ok(Arc::clone(self));
        }
        if name == ".." {
            return Ok(self.parent());
        }
        match &self.backend {
            Backend::Host(dir) => dir.child(self, name),
        }
    }

    /// Opens this node itself as a read-only directory handle.
    pub fn open_directory(self: &Arc<Self>) -> SysResult<RealFd> {
        match &self.backend {
            Backend::Host(dir) => dir.open_directory(self),
        }
    }

    /// Opens a non-directory entry. Directories have to go through
    /// [`open_directory`](Self::open_directory) on their own node.
    pub fn open_file(&self, name: impl AsRef<OsStr>, flags: i32, mode: u32) -> SysResult<RealFd> {
        match &self.backend {
            Backend::Host(dir) => dir.open_file(name.as_ref(), flags, mode),
        }
    }

    /// Raw entry names, `.` and `..` included, in host order.
    pub fn enumerate(&self) -> SysResult<Vec<OsString>> {
        match &self.backend {
            Backend::Host(dir) => dir.enumerate(),
        }
    }

    pub fn read_link(&self, name: impl AsRef<OsStr>) -> SysResult<OsString> {
        match &self.backend {
            Backend::Host(dir) => dir.read_link(name.as_ref()),
        }
    }

    /// `mkdir(".")` always succeeds without touching anything.
    pub fn mkdir(&self, name: impl AsRef<OsStr>, mode: u32) -> SysResult<()> {
        let name = name.as_ref();
        if name == "." {
            return Ok(());
        }
        match &self.backend {
            Backend::Host(dir) => dir.mkdir(name, mode),
        }
    }

    pub fn rmdir(&self, name: impl AsRef<OsStr>) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.rmdir(name.as_ref()),
        }
    }

    pub fn mknod(&self, name: impl AsRef<OsStr>, mode: u32, dev: u64) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.mknod(name.as_ref(), mode, dev),
        }
    }

    /// An empty name checks the node itself.
    pub fn access(&self, name: impl AsRef<OsStr>, mode: i32) -> SysResult<i32> {
        match &self.backend {
            Backend::Host(dir) => dir.access(name.as_ref(), mode),
        }
    }

    pub fn chmod(&self, name: impl AsRef<OsStr>, mode: u32) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.chmod(name.as_ref(), mode),
        }
    }

    pub fn chown(&self, name: impl AsRef<OsStr>, owner: u32, group: u32) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.chown(name.as_ref(), owner, group, self.config.fake_root),
        }
    }

    /// Creates `name` as a symlink pointing at `target`.
    pub fn symlink(&self, name: impl AsRef<OsStr>, target: impl AsRef<OsStr>) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.symlink(name.as_ref(), target.as_ref()),
        }
    }

    /// Sets access and modification times; `None` means now.
    pub fn utimes(&self, name: impl AsRef<OsStr>, times: Option<&[TimeVal; 2]>) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.utimes(name.as_ref(), times),
        }
    }

    /// Moves `from` in this node to `to` in `other`.
    pub fn rename(
        &self,
        from: impl AsRef<OsStr>,
        other: &VfsNode,
        to: impl AsRef<OsStr>,
    ) -> SysResult<()> {
        let (from, to) = (from.as_ref(), to.as_ref());
        if is_special_name(from) || is_special_name(to) {
            return Err(syscall_error(Errno::EINVAL, "rename"));
        }
        let dest = other.as_host("rename")?;
        match &self.backend {
            Backend::Host(dir) => dir.rename(from, dest, to),
        }
    }

    /// Creates `name` in this node as a new hard link to the existing entry
    /// `target` in `target_node`.
    pub fn link(
        &self,
        name: impl AsRef<OsStr>,
        target_node: &VfsNode,
        target: impl AsRef<OsStr>,
    ) -> SysResult<()> {
        let (name, target) = (name.as_ref(), target.as_ref());
        if is_special_name(name) || is_special_name(target) {
            return Err(syscall_error(Errno::EINVAL, "link"));
        }
        let existing = target_node.as_host("link")?;
        match &self.backend {
            Backend::Host(dir) => dir.link(name, existing, target),
        }
    }

    pub fn unlink(&self, name: impl AsRef<OsStr>) -> SysResult<()> {
        match &self.backend {
            Backend::Host(dir) => dir.unlink(name.as_ref()),
        }
    }
}
