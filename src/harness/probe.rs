//! Platform metrics: per-thread CPU time and resident memory.

use std::time::Duration;

/// What a probe can actually measure on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeCapabilities {
    pub cpu_time: bool,
    pub memory: bool,
}

/// Source of CPU and memory readings for the harness.
///
/// A reading the platform cannot provide is `None`, never zero, so the
/// harness can tell "unsupported" apart from "took no time".
pub trait MetricsProbe {
    fn capabilities(&self) -> ProbeCapabilities;

    /// CPU time consumed so far by the calling thread.
    fn thread_cpu_time(&self) -> Option<Duration>;

    /// Current memory footprint of the process in bytes.
    fn memory_snapshot(&self) -> Option<u64>;

    /// Hook run before every measured iteration so memory left over from the
    /// previous one is not counted against the next. Rust frees eagerly, so
    /// the system probe has nothing to do here.
    fn collect_garbage(&self) {}
}

/// Probe backed by the operating system.
///
/// CPU time comes from `CLOCK_THREAD_CPUTIME_ID`; memory is the resident set
/// size from `/proc/self/statm` (Linux only).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl SystemProbe {
    pub fn new() -> Self {
        SystemProbe
    }
}

impl MetricsProbe for SystemProbe {
    fn capabilities(&self) -> ProbeCapabilities {
        ProbeCapabilities {
            cpu_time: self.thread_cpu_time().is_some(),
            memory: self.memory_snapshot().is_some(),
        }
    }

    #[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
    fn thread_cpu_time(&self) -> Option<Duration> {
        // SAFETY: timespec is plain data; all-zero is a valid value.
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
        if rc != 0 {
            return None;
        }
        Some(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
    }

    #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
    fn thread_cpu_time(&self) -> Option<Duration> {
        None
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn memory_snapshot(&self) -> Option<u64> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
        // SAFETY: sysconf has no preconditions.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return None;
        }
        Some(resident_pages * page_size as u64)
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn memory_snapshot(&self) -> Option<u64> {
        None
    }
}
