// Open host descriptors handed out by the VFS
use std::os::unix::io::RawFd;
use std::sync::Arc;

use sysdefs::constants::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use sysdefs::data::fs_struct::StatData;

use super::errnos::{check, SysResult};
use super::fs_conv::convert_statdata_to_user;
use crate::filesystem::VfsNode;

/// One open host file or directory descriptor.
///
/// When the descriptor was produced by opening a node itself (a directory
/// handle), the node rides along so that stat-by-descriptor can be answered
/// from the node without a path.
#[derive(Debug)]
pub struct RealFd {
    fd: RawFd,
    node: Option<Arc<VfsNode>>,
}

impl RealFd {
    pub fn new(fd: RawFd, node: Option<Arc<VfsNode>>) -> Self {
        RealFd { fd, node }
    }

    pub fn raw(&self) -> RawFd {
        self.fd
    }

    pub fn node(&self) -> Option<&Arc<VfsNode>> {
        self.node.as_ref()
    }

    pub fn fstat(&self) -> SysResult<StatData> {
        if let Some(node) = &self.node {
            return node.stat(".");
        }
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        check(unsafe { libc::fstat(self.fd, &mut st) }, "fstat")?;
        Ok(convert_statdata_to_user(&st))
    }
}

/// This layer runs in the same host process as the emulated program, so the
/// standard streams are never closed from here.
impl Drop for RealFd {
    fn drop(&mut self) {
        if self.fd == STDIN_FILENO || self.fd == STDOUT_FILENO || self.fd == STDERR_FILENO {
            return;
        }
        if unsafe { libc::close(self.fd) } < 0 {
            let err = std::io::Error::last_os_error();
            tracing::warn!(fd = self.fd, %err, "close failed");
        }
    }
}
