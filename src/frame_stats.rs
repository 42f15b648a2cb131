// Copyright (C) 2020-2026 Andy Kurnia.

use super::{
    clock::{self, Clock, MonotonicClock},
    config::TelemetryConfig,
    realtime_value::{RealtimeSnapshot, RealtimeValue},
};

const NANOS_PER_MILLI: f64 = 1e6;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameStatsSnapshot {
    pub frame_count: u64,
    pub previous_frame_time_ms: f64,
    pub average_fps: f64,
    pub average_frame_time_ms: f64,
    pub frame_time_ms: RealtimeSnapshot,
}

// Per-frame bookkeeping for a render loop: frame count, last frame time,
// averages over a rolling window (or since start), and a smoothed frame time.
pub struct FrameStats<C: Clock + Clone = MonotonicClock> {
    clock: C,
    start_timestamp: u64,
    frame_start_timestamp: u64,
    frame_count: u64,
    previous_frame_time_ms: f64,
    stats_frame_window: usize,
    frame_times_ms: std::collections::VecDeque<f64>,
    average_fps: f64,
    average_frame_time_ms: f64,
    frame_time_ms: RealtimeValue<f64, f64, C>,
}

impl FrameStats<MonotonicClock> {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<C: Clock + Clone> FrameStats<C> {
    pub fn with_clock(config: &TelemetryConfig, clock: C) -> Self {
        let start_timestamp = clock.timestamp().unwrap_or_else(|err| {
            tracing::info!(%err, "failed to get start timestamp");
            0
        });
        Self {
            frame_time_ms: RealtimeValue::with_clock(config.half_life_seconds, clock.clone()),
            clock,
            start_timestamp,
            frame_start_timestamp: start_timestamp,
            frame_count: 0,
            previous_frame_time_ms: 0.0,
            stats_frame_window: config.stats_frame_window,
            frame_times_ms: std::collections::VecDeque::with_capacity(config.stats_frame_window),
            average_fps: 0.0,
            average_frame_time_ms: 0.0,
        }
    }

    pub fn begin_frame(&mut self) {
        match self.clock.timestamp() {
            Ok(timestamp) => self.frame_start_timestamp = timestamp,
            Err(err) => {
                tracing::info!(%err, "failed to get frame start timestamp");
            }
        }
    }

    pub fn end_frame(&mut self) {
        let now = match self.clock.timestamp() {
            Ok(timestamp) => timestamp,
            Err(err) => {
                tracing::info!(%err, "failed to get frame end timestamp");
                return;
            }
        };
        self.frame_count += 1;
        self.previous_frame_time_ms =
            now.saturating_sub(self.frame_start_timestamp) as f64 / NANOS_PER_MILLI;

        if self.stats_frame_window > 0 {
            self.frame_times_ms.push_back(self.previous_frame_time_ms);
            while self.frame_times_ms.len() > self.stats_frame_window {
                self.frame_times_ms.pop_front();
            }
            let total_ms = self.frame_times_ms.iter().sum::<f64>();
            let n = self.frame_times_ms.len() as f64;
            self.average_fps = per_second(n, total_ms);
            self.average_frame_time_ms = total_ms / n;
        } else {
            let elapsed_ms = now.saturating_sub(self.start_timestamp) as f64 / NANOS_PER_MILLI;
            let n = self.frame_count as f64;
            self.average_fps = per_second(n, elapsed_ms);
            self.average_frame_time_ms = elapsed_ms / n;
        }

        self.frame_time_ms.update_at(self.previous_frame_time_ms, now);
    }

    #[inline(always)]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline(always)]
    pub fn previous_frame_time_ms(&self) -> f64 {
        self.previous_frame_time_ms
    }

    #[inline(always)]
    pub fn average_fps(&self) -> f64 {
        self.average_fps
    }

    #[inline(always)]
    pub fn average_frame_time_ms(&self) -> f64 {
        self.average_frame_time_ms
    }

    #[inline(always)]
    pub fn frame_time_ms(&self) -> &RealtimeValue<f64, f64, C> {
        &self.frame_time_ms
    }

    // time since construction, zero if the clock cannot be read.
    pub fn elapsed(&self) -> std::time::Duration {
        match self.clock.timestamp() {
            Ok(now) => std::time::Duration::from_nanos(now.saturating_sub(self.start_timestamp)),
            Err(_) => std::time::Duration::ZERO,
        }
    }

    // how long to wait so that frames do not run ahead of paced_frame_rate
    // per second, counted from the start. 0 disables pacing.
    pub fn pacing_delay(&self, paced_frame_rate: u32) -> std::time::Duration {
        if paced_frame_rate == 0 || self.frame_count == 0 {
            return std::time::Duration::ZERO;
        }
        let Ok(now) = self.clock.timestamp() else {
            return std::time::Duration::ZERO;
        };
        let expected = self.start_timestamp as f64
            + self.frame_count as f64 * clock::SECONDS_TO_NANOS / paced_frame_rate as f64;
        let diff = expected - now as f64;
        if diff > 0.0 {
            std::time::Duration::from_nanos(diff as u64)
        } else {
            std::time::Duration::ZERO
        }
    }

    pub fn clear_history(&mut self) {
        self.frame_times_ms.clear();
        self.frame_time_ms.clear_history();
    }

    pub fn snapshot(&self) -> FrameStatsSnapshot {
        FrameStatsSnapshot {
            frame_count: self.frame_count,
            previous_frame_time_ms: self.previous_frame_time_ms,
            average_fps: self.average_fps,
            average_frame_time_ms: self.average_frame_time_ms,
            frame_time_ms: self.frame_time_ms.snapshot(),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(frames = self.frame_count, "frame count");
        tracing::info!("average frame time: {:.3} ms", self.average_frame_time_ms);
        tracing::info!("average FPS: {:.3}", self.average_fps);
        tracing::info!("smoothed frame time: {} ms", self.frame_time_ms.snapshot());
    }
}

// zero-length intervals give 0 instead of infinity.
#[inline(always)]
fn per_second(count: f64, ms: f64) -> f64 {
    if ms > 0.0 { count / (ms / 1000.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, config::make_default_telemetry_config};
    use approx::assert_relative_eq;

    const MS: u64 = 1_000_000;

    fn run_frame(stats: &mut FrameStats<ManualClock>, clock: &ManualClock, ms: u64) {
        stats.begin_frame();
        clock.advance_nanos(ms * MS);
        stats.end_frame();
    }

    #[test]
    fn cumulative_averages() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        run_frame(&mut stats, &clock, 10);
        assert_eq!(stats.frame_count(), 1);
        assert_eq!(stats.previous_frame_time_ms(), 10.0);
        assert_relative_eq!(stats.average_fps(), 100.0, epsilon = 1e-9);
        run_frame(&mut stats, &clock, 20);
        assert_eq!(stats.frame_count(), 2);
        assert_eq!(stats.previous_frame_time_ms(), 20.0);
        assert_relative_eq!(stats.average_frame_time_ms(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(stats.average_fps(), 2.0 / 0.03, epsilon = 1e-9);
    }

    #[test]
    fn rolling_window_averages() {
        let config = TelemetryConfig {
            stats_frame_window: 2,
            ..make_default_telemetry_config()
        };
        let clock = ManualClock::starting_at(1_000 * MS);
        let mut stats = FrameStats::with_clock(&config, clock.clone());
        for ms in [10, 20, 30] {
            run_frame(&mut stats, &clock, ms);
        }
        assert_eq!(stats.frame_count(), 3);
        assert_relative_eq!(stats.average_frame_time_ms(), 25.0, epsilon = 1e-9);
        assert_relative_eq!(stats.average_fps(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn idle_time_between_frames_stays_out_of_window() {
        let config = TelemetryConfig {
            stats_frame_window: 8,
            ..make_default_telemetry_config()
        };
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&config, clock.clone());
        run_frame(&mut stats, &clock, 10);
        clock.advance_nanos(500 * MS);
        run_frame(&mut stats, &clock, 10);
        assert_relative_eq!(stats.average_frame_time_ms(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(stats.average_fps(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn smoothed_frame_time_favors_recent_frames() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        run_frame(&mut stats, &clock, 10);
        run_frame(&mut stats, &clock, 20);
        let frame_time = stats.frame_time_ms();
        assert_eq!(frame_time.value(), 20.0);
        assert!(frame_time.mean() > 15.0 && frame_time.mean() < 20.0);
        assert!(frame_time.weight() < 2.0);
    }

    #[test]
    fn zero_length_frame_reports_zero_fps() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        stats.begin_frame();
        stats.end_frame();
        assert_eq!(stats.frame_count(), 1);
        assert_eq!(stats.average_fps(), 0.0);
        assert_eq!(stats.average_frame_time_ms(), 0.0);
    }

    #[test]
    fn clock_failure_skips_frame() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        run_frame(&mut stats, &clock, 16);
        let before = stats.snapshot();
        clock.set_failing(true);
        run_frame(&mut stats, &clock, 16);
        assert_eq!(stats.snapshot(), before);
    }

    #[test]
    fn clear_history_restarts_window() {
        let config = TelemetryConfig {
            stats_frame_window: 4,
            ..make_default_telemetry_config()
        };
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&config, clock.clone());
        run_frame(&mut stats, &clock, 10);
        run_frame(&mut stats, &clock, 30);
        let mean = stats.frame_time_ms().mean();
        stats.clear_history();
        assert_eq!(stats.frame_count(), 2);
        assert_eq!(stats.frame_time_ms().weight(), 0.0);
        assert_eq!(stats.frame_time_ms().mean(), mean);
        run_frame(&mut stats, &clock, 40);
        assert_eq!(stats.frame_count(), 3);
        assert_relative_eq!(stats.average_frame_time_ms(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(stats.average_fps(), 25.0, epsilon = 1e-9);
        assert_eq!(stats.frame_time_ms().weight(), 1.0);
        assert_relative_eq!(stats.frame_time_ms().mean(), 40.0, epsilon = 1e-9);
        stats.log_summary();
    }

    #[test]
    fn pacing_waits_for_the_frame_deadline() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        assert_eq!(stats.pacing_delay(50), std::time::Duration::ZERO);
        run_frame(&mut stats, &clock, 5);
        assert_eq!(stats.pacing_delay(50), std::time::Duration::from_millis(15));
        assert_eq!(stats.pacing_delay(0), std::time::Duration::ZERO);
        clock.advance_nanos(15 * MS);
        run_frame(&mut stats, &clock, 30);
        // already behind, no waiting.
        assert_eq!(stats.pacing_delay(50), std::time::Duration::ZERO);
        assert_eq!(stats.elapsed(), std::time::Duration::from_millis(50));
        clock.set_failing(true);
        assert_eq!(stats.elapsed(), std::time::Duration::ZERO);
    }

    #[test]
    fn snapshot_serializes() {
        let clock = ManualClock::new();
        let mut stats = FrameStats::with_clock(&make_default_telemetry_config(), clock.clone());
        run_frame(&mut stats, &clock, 16);
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["frame_count"], 1);
        assert_eq!(json["frame_time_ms"]["value"], 16.0);
    }
}
