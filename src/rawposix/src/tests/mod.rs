// RawPOSIX Test Suite
//
// Unit tests for the VFS node, the filesystem and time handlers and the
// host interface helpers. Everything runs against real host directories
// created under a fresh temporary directory per test.
//
// Filesystem tests need no serialization of their own: every node
// operation takes the global cwd lock. Tests touching process-wide signal
// or timer state go through test_setup().

mod fs_call_tests; // Handlers driven through a Cage and SyscallArgs
mod interface_tests; // errno translation, config, argument decoding, conversions

use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::cage::Cage;
use crate::filesystem::VfsNode;
use crate::interface::{ArgSlot, VfsConfig};

lazy_static::lazy_static! {
    // Global test mutex for tests that change signal dispositions or timers
    static ref TEST_MUTEX: Mutex<bool> = Mutex::new(true);
}

/// Setup function for tests that touch process-wide state
/// Returns a lock guard that keeps the test serialized
pub fn test_setup() -> parking_lot::MutexGuard<'static, bool> {
    init_tracing();
    TEST_MUTEX.lock()
}

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Test cage ID used for all tests
pub const TEST_CAGE_ID: u64 = 999;

/// A scratch directory and a root node over it.
pub fn scratch_root(fake_root: bool) -> (TempDir, Arc<VfsNode>) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = VfsNode::new_root(dir.path(), Arc::new(VfsConfig { fake_root })).unwrap();
    (dir, root)
}

/// A scratch directory and a cage rooted in it.
pub fn scratch_cage() -> (TempDir, Cage) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let cage = Cage::new(TEST_CAGE_ID, dir.path().to_str().unwrap(), VfsConfig::default()).unwrap();
    (dir, cage)
}

/// NUL-terminated copy of `s`, kept alive by the caller while its address
/// sits in an argument record.
pub fn cstr(s: &str) -> Vec<u8> {
    let mut v = s.as_bytes().to_vec();
    v.push(0);
    v
}

/// Argument slot pointing at a NUL-terminated buffer.
pub fn path_arg(buf: &[u8]) -> ArgSlot {
    ArgSlot::from(buf.as_ptr())
}

/// Argument slot pointing at a value the test owns.
pub fn ptr_arg<T>(value: &mut T) -> ArgSlot {
    ArgSlot::from(value as *mut T)
}
