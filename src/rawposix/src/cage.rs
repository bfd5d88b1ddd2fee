//! The filesystem view of one emulated process.
//!
//! Only the fields the filesystem handlers need live here: where the
//! process's `/` is, where its current directory is and which host
//! descriptors it holds open. Everything else about process emulation is
//! somebody else's business.
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use sysdefs::constants::Errno;

use crate::filesystem::VfsNode;
use crate::interface::{syscall_error, RealFd, SysResult, VfsConfig};

#[derive(Debug)]
pub struct Cage {
    // Identifying ID number for this cage
    pub cageid: u64,
    // The node emulated absolute paths start from
    pub root: Arc<VfsNode>,
    // Current working directory of cage, relative paths start from here
    pub cwd: RwLock<Arc<VfsNode>>,
    // Open handles keyed by host descriptor. Dropping an entry closes it.
    pub fds: DashMap<i32, RealFd>,
}

impl Cage {
    /// A cage whose root and cwd are both `root_path` on the host.
    pub fn new(cageid: u64, root_path: &str, config: VfsConfig) -> SysResult<Cage> {
        let root = VfsNode::new_root(root_path, Arc::new(config))?;
        Ok(Cage {
            cageid,
            cwd: RwLock::new(Arc::clone(&root)),
            root,
            fds: DashMap::new(),
        })
    }

    pub fn cwd(&self) -> Arc<VfsNode> {
        self.cwd.read().clone()
    }

    pub fn set_cwd(&self, node: Arc<VfsNode>) {
        *self.cwd.write() = node;
    }

    /// Splits a Linux path into the node holding its last component and that
    /// component's name. Every earlier component is walked with `traverse`.
    /// A path with no components at all (`/`, `//`) names the start node
    /// itself, returned as `(start, ".")`. Components are raw bytes.
    pub fn resolve_parent(&self, path: impl AsRef<OsStr>) -> SysResult<(Arc<VfsNode>, OsString)> {
        let path = path.as_ref().as_bytes();
        if path.is_empty() {
            return Err(syscall_error(Errno::ENOENT, "resolve"));
        }
        let mut node = if path[0] == b'/' {
            Arc::clone(&self.root)
        } else {
            self.cwd()
        };
        let mut components: Vec<&OsStr> = path
            .split(|b| *b == b'/')
            .filter(|c| !c.is_empty())
            .map(OsStr::from_bytes)
            .collect();
        let last = match components.pop() {
            Some(last) => last,
            None => return Ok((node, OsString::from("."))),
        };
        for component in components {
            node = node.traverse(component)?;
        }
        Ok((node, last.to_os_string()))
    }

    /// Walks every component of `path`, returning the node it names.
    pub fn resolve(&self, path: impl AsRef<OsStr>) -> SysResult<Arc<VfsNode>> {
        let (parent, name) = self.resolve_parent(path)?;
        parent.traverse(&name)
    }

    pub fn insert_fd(&self, handle: RealFd) -> i32 {
        let fd = handle.raw();
        self.fds.insert(fd, handle);
        fd
    }
}
