#![allow(dead_code)]

// ===== Clock Identifiers =====
// Source: include/uapi/linux/time.h
pub const CLOCK_REALTIME: i32 = 0;
pub const CLOCK_MONOTONIC: i32 = 1;

// ===== Interval Timers =====
// Source: include/uapi/linux/time.h
// Numbering matches POSIX hosts, so `which` is forwarded untranslated.
pub const ITIMER_REAL: i32 = 0; // Real-time timer, delivers SIGALRM
pub const ITIMER_VIRTUAL: i32 = 1; // Process virtual time, delivers SIGVTALRM
pub const ITIMER_PROF: i32 = 2; // Profiling timer, delivers SIGPROF

// ===== Time Units =====
pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const MICROS_PER_SEC: i64 = 1_000_000;
pub const NANOS_PER_MICRO: i64 = 1_000;

/// Host `CLOCKS_PER_SEC`, from `<time.h>` (glibc `bits/time.h`). XSI fixes it
/// at one million; the synthetic clock resolution is built from it.
pub const CLOCKS_PER_SEC: i64 = 1_000_000;

// ===== Signal Constants used by tests and timers =====
// Source: include/uapi/asm-generic/signal.h
pub const SIGALRM: i32 = 14; // Timer signal from alarm(2)
pub const SIGVTALRM: i32 = 26; // Virtual timer expired
pub const SIGPROF: i32 = 27; // Profiling timer expired
