// Copyright (C) 2020-2026 Andy Kurnia.

use super::{error, realtime_value};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    pub half_life_seconds: f64,
    // 0 averages over every frame since start.
    pub stats_frame_window: usize,
    // overlay only. 0 runs until interrupted.
    pub frame_count: u64,
    pub target_frame_ms: f64,
    pub jitter_ms: f64,
    // overlay only. frames per second to pace to, 0 does not pace.
    pub paced_frame_rate: u32,
    // overlay only. stops after this long, 0 has no limit.
    pub run_time_ms: u64,
    pub report_every: u64,
    pub seed: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        make_default_telemetry_config()
    }
}

pub fn make_default_telemetry_config() -> TelemetryConfig {
    TelemetryConfig {
        half_life_seconds: realtime_value::DEFAULT_HALF_LIFE_SECONDS,
        stats_frame_window: 0,
        frame_count: 600,
        target_frame_ms: 1000.0 / 60.0,
        jitter_ms: 2.0,
        paced_frame_rate: 0,
        run_time_ms: 0,
        report_every: 60,
        seed: None,
    }
}

impl TelemetryConfig {
    pub fn from_json_str(data: &str) -> error::Returns<Self> {
        let ret = serde_json::from_str::<Self>(data)?;
        ret.validate()?;
        tracing::debug!(?ret, "loaded telemetry config");
        Ok(ret)
    }

    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> error::Returns<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> error::Returns<()> {
        if !(self.half_life_seconds.is_finite() && self.half_life_seconds > 0.0) {
            return_error!(format!(
                "half_life_seconds must be positive, got {}",
                self.half_life_seconds
            ));
        }
        if self.report_every == 0 {
            return_error!("report_every must be positive".into());
        }
        if !(self.target_frame_ms.is_finite() && self.target_frame_ms >= 0.0) {
            return_error!(format!(
                "target_frame_ms must not be negative, got {}",
                self.target_frame_ms
            ));
        }
        if !(self.jitter_ms.is_finite() && self.jitter_ms >= 0.0) {
            return_error!(format!("jitter_ms must not be negative, got {}", self.jitter_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = TelemetryConfig::from_json_str("{}").unwrap();
        assert_eq!(config, make_default_telemetry_config());
        assert_eq!(config.half_life_seconds, 0.5);
    }

    #[test]
    fn fields_override_defaults() {
        let config = TelemetryConfig::from_json_str(
            r#"{ "half_life_seconds": 2.0, "stats_frame_window": 30, "seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(config.half_life_seconds, 2.0);
        assert_eq!(config.stats_frame_window, 30);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.report_every, 60);
        assert_eq!(config.paced_frame_rate, 0);
    }

    #[test]
    fn overlay_limits() {
        let config =
            TelemetryConfig::from_json_str(r#"{ "paced_frame_rate": 30, "run_time_ms": 2500 }"#)
                .unwrap();
        assert_eq!(config.paced_frame_rate, 30);
        assert_eq!(config.run_time_ms, 2500);
        assert_eq!(config.frame_count, 600);
    }

    #[test]
    fn rejects_bad_values() {
        for data in [
            r#"{ "half_life_seconds": 0.0 }"#,
            r#"{ "half_life_seconds": -1.0 }"#,
            r#"{ "report_every": 0 }"#,
            r#"{ "jitter_ms": -0.5 }"#,
            r#"{ "target_frame_ms": -16.0 }"#,
            r#"{ "half_life_seconds": "slow" }"#,
        ] {
            assert!(TelemetryConfig::from_json_str(data).is_err(), "{}", data);
        }
        let err = TelemetryConfig::from_json_str(r#"{ "half_life_seconds": 0.0 }"#).unwrap_err();
        assert_eq!(err.to_string(), "half_life_seconds must be positive, got 0");
    }
}
