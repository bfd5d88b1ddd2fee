// Misc functions for interface
// The working-directory lock and configuration.
use std::ffi::CStr;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::Deserialize;
use sysdefs::constants::FAKE_ROOT_ENV;

use super::errnos::{check, SysResult};

lazy_static::lazy_static! {
    // Guards the host process's current working directory. Relative host
    // calls resolve against that single process-wide value, so any operation
    // that sets it and then relies on it must hold this for its whole
    // duration. Re-entrant so that rename/link can hold it across their own
    // path computation and the nested scoping step.
    static ref CWD_LOCK: ReentrantMutex<()> = ReentrantMutex::new(());
}

/// Proof that the caller holds the working-directory lock.
///
/// The host cwd can only be changed through a guard, so there is no way to
/// set it without also excluding every other scoped operation.
pub struct CwdGuard {
    _held: ReentrantMutexGuard<'static, ()>,
}

pub fn lock_cwd() -> CwdGuard {
    CwdGuard {
        _held: CWD_LOCK.lock(),
    }
}

/// Sets the host working directory. Only callable while holding the lock.
pub fn set_host_cwd(_guard: &CwdGuard, path: &CStr) -> SysResult<()> {
    check(unsafe { libc::chdir(path.as_ptr()) }, "chdir")?;
    Ok(())
}

/// Configuration consumed by the VFS.
///
/// Built once and handed to the root node; every node reached from that
/// root shares it, so no operation ever reads ambient global state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    /// Operate as if superuser for ownership changes: `chown` reports success
    /// without touching the host.
    pub fake_root: bool,
}

impl VfsConfig {
    /// Reads `RAWPOSIX_FAKE_ROOT` (`1`/`true`/`yes`, case-insensitive).
    pub fn from_env() -> Self {
        let fake_root = std::env::var(FAKE_ROOT_ENV)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        VfsConfig { fake_root }
    }
}
