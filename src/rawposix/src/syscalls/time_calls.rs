//! Time syscall handlers
//!
//! No locking here: none of these depend on the host cwd. The structures
//! the emulated process passes are layout-identical to the host's (checked
//! at build time in `sysdefs`), so pointers go to the host untouched.
use std::time::{Duration, Instant};

use sysdefs::constants::sys_const::{
    CLOCKS_PER_SEC, CLOCK_MONOTONIC, CLOCK_REALTIME, MICROS_PER_SEC, NANOS_PER_MICRO,
    NANOS_PER_SEC,
};
use sysdefs::constants::Errno;
use sysdefs::data::sys_struct::{ITimerVal, TimeSpec, TimeT, TimeVal, Tms};

use crate::interface::{check, host_error, syscall_error, SysResult, SyscallArgs};

fn supported_clock(clockid: i32) -> bool {
    clockid == CLOCK_REALTIME || clockid == CLOCK_MONOTONIC
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/gettimeofday.2.html
///
/// The timezone argument is obsolete and ignored.
pub fn gettimeofday_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let tv = args.arg(0).as_struct_mut::<TimeVal>("gettimeofday")?;
    check(
        unsafe {
            libc::gettimeofday(tv as *mut TimeVal as *mut libc::timeval, std::ptr::null_mut())
        },
        "gettimeofday",
    )?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/time.2.html
pub fn time_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let now = unsafe { libc::time(std::ptr::null_mut()) };
    if now == -1 {
        return Err(host_error("time"));
    }
    if !args.arg(0).is_null() {
        *args.arg(0).as_struct_mut::<TimeT>("time")? = now as TimeT;
    }
    Ok(now as i64)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/clock_gettime.2.html
///
/// Both supported clocks read the wall clock with microsecond resolution,
/// so `CLOCK_MONOTONIC` here is not actually monotonic.
pub fn clock_gettime_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let clockid = args.arg(0).s32();
    if !supported_clock(clockid) {
        return Err(syscall_error(Errno::EINVAL, "clock_gettime"));
    }
    let tp = args.arg(1).as_struct_mut::<TimeSpec>("clock_gettime")?;
    let mut tv: libc::timeval = unsafe { std::mem::zeroed() };
    if unsafe { libc::gettimeofday(&mut tv, std::ptr::null_mut()) } != 0 {
        return Err(syscall_error(Errno::EINVAL, "clock_gettime"));
    }
    tp.tv_sec = tv.tv_sec as i64;
    tp.tv_nsec = tv.tv_usec as i64 * NANOS_PER_MICRO;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/clock_getres.2.html
pub fn clock_getres_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let clockid = args.arg(0).s32();
    if !supported_clock(clockid) {
        return Err(syscall_error(Errno::EINVAL, "clock_getres"));
    }
    if !args.arg(1).is_null() {
        let res = args.arg(1).as_struct_mut::<TimeSpec>("clock_getres")?;
        *res = TimeSpec {
            tv_sec: 0,
            tv_nsec: NANOS_PER_SEC / CLOCKS_PER_SEC,
        };
    }
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/setitimer.2.html
pub fn setitimer_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let which = args.arg(0).s32();
    let new = args.arg(1).as_struct::<ITimerVal>("setitimer")?;
    let old = args.arg(2).p::<libc::itimerval>();
    check(
        unsafe {
            libc::setitimer(
                which as _,
                new as *const ITimerVal as *const libc::itimerval,
                old,
            )
        },
        "setitimer",
    )?;
    Ok(0)
}

pub fn getitimer_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let which = args.arg(0).s32();
    let cur = args.arg(1).as_struct_mut::<ITimerVal>("getitimer")?;
    check(
        unsafe { libc::getitimer(which as _, cur as *mut ITimerVal as *mut libc::itimerval) },
        "getitimer",
    )?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/nanosleep.2.html
///
/// Sleeps in the host's `select` with an empty descriptor set. The request
/// is rounded up to whole microseconds. When `rem` is given it always
/// receives what was left of the request, zero after a full sleep.
///
/// ## Returns:
/// 0, or `EINTR` when a signal cut the sleep short
pub fn nanosleep_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let req = *args.arg(0).as_struct::<TimeSpec>("nanosleep")?;
    if req.tv_sec < 0 || req.tv_nsec < 0 || req.tv_nsec >= NANOS_PER_SEC {
        return Err(syscall_error(Errno::EINVAL, "nanosleep"));
    }
    let requested = Duration::new(req.tv_sec as u64, req.tv_nsec as u32);

    let mut usec = (req.tv_nsec + NANOS_PER_MICRO - 1) / NANOS_PER_MICRO;
    let mut sec = req.tv_sec;
    if usec == MICROS_PER_SEC {
        match sec.checked_add(1) {
            Some(next) => {
                sec = next;
                usec = 0;
            }
            // already the longest timeout select can be given
            None => usec = MICROS_PER_SEC - 1,
        }
    }
    let mut tv = libc::timeval {
        tv_sec: sec as libc::time_t,
        tv_usec: usec as libc::suseconds_t,
    };

    let start = Instant::now();
    let ret = unsafe {
        libc::select(
            0,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            &mut tv,
        )
    };
    // errno has to be read before anything else runs
    let outcome = check(ret, "nanosleep");

    if !args.arg(1).is_null() {
        let left = requested.saturating_sub(start.elapsed());
        let rem = args.arg(1).as_struct_mut::<TimeSpec>("nanosleep")?;
        *rem = TimeSpec {
            tv_sec: left.as_secs() as i64,
            tv_nsec: left.subsec_nanos() as i64,
        };
    }
    outcome?;
    Ok(0)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/alarm.2.html
///
/// ## Returns:
/// seconds that were left on the previous alarm, 0 if there was none
pub fn alarm_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let seconds = args.arg(0).u32();
    Ok(unsafe { libc::alarm(seconds) } as i64)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/times.2.html
///
/// A null buffer is allowed; only the tick count comes back then.
pub fn times_syscall(args: &SyscallArgs) -> SysResult<i64> {
    let mut scratch = Tms::default();
    let buf = if args.arg(0).is_null() {
        &mut scratch
    } else {
        args.arg(0).as_struct_mut::<Tms>("times")?
    };
    let ticks = unsafe { libc::times(buf as *mut Tms as *mut libc::tms) };
    if ticks as i64 == -1 {
        return Err(host_error("times"));
    }
    Ok(ticks as i64)
}
