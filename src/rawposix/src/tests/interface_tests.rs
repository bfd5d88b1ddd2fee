// Interface helper tests
//
// errno translation, the error type, configuration, argument decoding and
// the Linux-side structure conversions.

use std::os::unix::ffi::OsStrExt;

use sysdefs::constants::fs_const;
use sysdefs::constants::Errno;

use crate::interface::*;
use crate::tests::*;

// === ERRNO TRANSLATION ===

/// Test: host codes map onto the Linux namespace by name
#[test]
fn test_errno_from_host() {
    assert_eq!(Errno::from_host(libc::ENOENT), Errno::ENOENT);
    assert_eq!(Errno::from_host(libc::ETXTBSY), Errno::ETXTBSY);
    assert_eq!(Errno::from_host(libc::EWOULDBLOCK), Errno::EAGAIN);
    assert_eq!(Errno::from_host(libc::ENOTSUP), Errno::EOPNOTSUPP);
    assert_eq!(Errno::from_host(libc::ENOTEMPTY), Errno::ENOTEMPTY);
}

/// Test: codes the table doesn't know collapse to EIO
#[test]
fn test_errno_unknown_host_code() {
    assert_eq!(Errno::from_host(0), Errno::EIO);
    assert_eq!(Errno::from_host(100_000), Errno::EIO);
}

/// Test: the discriminant lookup finds Linux numbers
#[test]
fn test_errno_from_discriminant() {
    assert_eq!(Errno::from_discriminant(2), Ok(Errno::ENOENT));
    assert_eq!(Errno::from_discriminant(26), Ok(Errno::ETXTBSY));
    assert!(Errno::from_discriminant(0).is_err());
}

/// Test: a failed host call is captured with its translated errno
#[test]
fn test_check_captures_host_errno() {
    let missing = std::ffi::CString::new("/definitely/not/here").unwrap();
    let res = check(unsafe { libc::rmdir(missing.as_ptr()) }, "rmdir");
    assert_eq!(
        res,
        Err(SyscallError::Host {
            call: "rmdir",
            errno: Errno::ENOENT
        })
    );
    assert_eq!(check(0, "noop"), Ok(0));
    assert_eq!(check_size(7, "noop"), Ok(7));
}

/// Test: each error kind reports the right errno and call name
#[test]
fn test_syscall_error_kinds() {
    let invalid = syscall_error(Errno::EINVAL, "rename");
    assert_eq!(invalid.errno(), Errno::EINVAL);
    assert_eq!(invalid.call(), "rename");

    let mismatch = SyscallError::BackendMismatch { call: "link" };
    assert_eq!(mismatch.errno(), Errno::EXDEV);
    assert_eq!(mismatch.call(), "link");
    assert!(mismatch.to_string().contains("link"));
}

// === CONFIGURATION ===

/// Test: configuration deserializes with defaults for missing fields
#[test]
fn test_config_deserialize() {
    let cfg: VfsConfig = serde_json::from_str(r#"{"fake_root": true}"#).unwrap();
    assert!(cfg.fake_root);
    let cfg: VfsConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, VfsConfig::default());
    assert!(!cfg.fake_root);
}

/// Test: the environment toggle turns fake root on
#[test]
fn test_config_from_env() {
    let _guard = test_setup();
    std::env::set_var(sysdefs::constants::FAKE_ROOT_ENV, "TRUE");
    assert!(VfsConfig::from_env().fake_root);
    std::env::set_var(sysdefs::constants::FAKE_ROOT_ENV, "0");
    assert!(!VfsConfig::from_env().fake_root);
    std::env::remove_var(sysdefs::constants::FAKE_ROOT_ENV);
    assert!(!VfsConfig::from_env().fake_root);
}

// === ARGUMENT DECODING ===

/// Test: slots read back as signed, unsigned and narrowed values
#[test]
fn test_arg_slot_readings() {
    let slot = ArgSlot::from(-1i64);
    assert_eq!(slot.s(), -1);
    assert_eq!(slot.s32(), -1);
    assert_eq!(slot.u(), u64::MAX);
    assert_eq!(slot.u32(), u32::MAX);
    assert!(!slot.is_null());
    assert!(ArgSlot::default().is_null());

    let args = SyscallArgs::new(&[ArgSlot(1), ArgSlot(2)]);
    assert_eq!(args.arg(1), ArgSlot(2));
    assert_eq!(args.arg(5), ArgSlot(0));
}

/// Test: path decoding handles faults and length, and keeps raw bytes
#[test]
fn test_arg_slot_as_path() {
    let good = cstr("/a/b");
    assert_eq!(path_arg(&good).as_path("t").unwrap(), "/a/b");

    assert_eq!(ArgSlot::default().as_path("t").unwrap_err().errno(), Errno::EFAULT);

    let raw = vec![b'/', 0xff, 0xfe, 0];
    assert_eq!(path_arg(&raw).as_path("t").unwrap().as_bytes(), &raw[..3]);

    let long = cstr(&"x".repeat(sysdefs::constants::PATH_MAX));
    assert_eq!(path_arg(&long).as_path("t").unwrap_err().errno(), Errno::ENAMETOOLONG);
}

// === CONVERSIONS ===

/// Test: Linux open flags turn into the host's equivalents
#[test]
fn test_open_flags_to_host() {
    assert_eq!(open_flags_to_host(fs_const::O_RDONLY), libc::O_RDONLY);
    assert_eq!(
        open_flags_to_host(fs_const::O_WRONLY | fs_const::O_CREAT | fs_const::O_TRUNC),
        libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC
    );
    assert_eq!(
        open_flags_to_host(fs_const::O_RDWR | fs_const::O_APPEND | fs_const::O_CLOEXEC),
        libc::O_RDWR | libc::O_APPEND | libc::O_CLOEXEC
    );
    assert_ne!(open_flags_to_host(fs_const::O_SYNC) & libc::O_SYNC, 0);
    // unknown bits are dropped
    assert_eq!(open_flags_to_host(0x4000_0000), libc::O_RDONLY);
}

/// Test: host stat fields land in the Linux layout
#[test]
fn test_convert_statdata() {
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    st.st_ino = 77;
    st.st_mode = libc::S_IFDIR | 0o755;
    st.st_size = 4096;
    st.st_mtime = 123;
    let out = convert_statdata_to_user(&st);
    assert_eq!(out.st_ino, 77);
    assert_eq!(out.st_mode, fs_const::S_IFDIR | 0o755);
    assert!(out.is_dir());
    assert_eq!(out.st_size, 4096);
    assert_eq!(out.st_mtime, 123);
}
