//! Time-domain structures exchanged with the emulated process.
//!
//! The time syscalls hand pointers to these straight to the host, so each
//! one must be byte-compatible with the host structure of the same purpose.
//! The assertions at the bottom turn that assumption into a build failure on
//! hosts where it doesn't hold; such a host needs a field-by-field
//! translation layer instead.
use std::mem::{align_of, size_of};

pub type TimeT = i64;
pub type ClockT = i64;

#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct TimeVal {
    pub tv_sec: i64,
    pub tv_usec: i64,
}

#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct TimeSpec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct ITimerVal {
    pub it_interval: TimeVal,
    pub it_value: TimeVal,
}

// struct tms, all fields in clock ticks
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct Tms {
    pub tms_utime: ClockT,
    pub tms_stime: ClockT,
    pub tms_cutime: ClockT,
    pub tms_cstime: ClockT,
}

macro_rules! assert_host_layout {
    ($ours:ty, $host:ty) => {
        const _: () = assert!(size_of::<$ours>() == size_of::<$host>());
        const _: () = assert!(align_of::<$ours>() == align_of::<$host>());
    };
}

assert_host_layout!(TimeVal, libc::timeval);
assert_host_layout!(TimeSpec, libc::timespec);
assert_host_layout!(ITimerVal, libc::itimerval);
assert_host_layout!(Tms, libc::tms);
assert_host_layout!(TimeT, libc::time_t);
