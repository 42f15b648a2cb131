// Copyright (C) 2020-2026 Andy Kurnia.

// Timestamps are in nanoseconds.

pub const NANOS_TO_SECONDS: f64 = 1e-9;
pub const SECONDS_TO_NANOS: f64 = 1e9;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClockError {
    Unavailable,
    OutOfRange,
}

impl std::fmt::Display for ClockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "clock unavailable"),
            Self::OutOfRange => write!(f, "timestamp out of range"),
        }
    }
}

impl std::error::Error for ClockError {}

pub trait Clock {
    fn timestamp(&self) -> Result<u64, ClockError>;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline(always)]
    fn timestamp(&self) -> Result<u64, ClockError> {
        (**self).timestamp()
    }
}

static ORIGIN: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

// Nanoseconds since the first time any MonotonicClock was read in this process.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn timestamp(&self) -> Result<u64, ClockError> {
        let origin = *ORIGIN.get_or_init(std::time::Instant::now);
        u64::try_from(
            std::time::Instant::now()
                .saturating_duration_since(origin)
                .as_nanos(),
        )
        .map_err(|_| ClockError::OutOfRange)
    }
}

#[derive(Debug, Default)]
struct ManualClockState {
    nanos: std::sync::atomic::AtomicU64,
    failing: std::sync::atomic::AtomicBool,
}

// Clones share the same time, so a clone can be handed to a RealtimeValue
// while another handle moves time forward.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    state: std::sync::Arc<ManualClockState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(nanos: u64) -> Self {
        let ret = Self::new();
        ret.set_nanos(nanos);
        ret
    }

    pub fn nanos(&self) -> u64 {
        self.state
            .nanos
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn set_nanos(&self, nanos: u64) {
        self.state
            .nanos
            .store(nanos, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn advance_nanos(&self, nanos: u64) {
        self.state
            .nanos
            .fetch_add(nanos, std::sync::atomic::Ordering::Relaxed);
    }

    // negative or nan advances nothing.
    pub fn advance_seconds(&self, seconds: f64) {
        self.advance_nanos((seconds * SECONDS_TO_NANOS).round().max(0.0) as u64);
    }

    pub fn set_failing(&self, failing: bool) {
        self.state
            .failing
            .store(failing, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_failing(&self) -> bool {
        self.state
            .failing
            .load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl Clock for ManualClock {
    fn timestamp(&self) -> Result<u64, ClockError> {
        if self.is_failing() {
            Err(ClockError::Unavailable)
        } else {
            Ok(self.nanos())
        }
    }
}
