// Copyright (C) 2020-2026 Andy Kurnia.

// overlay [config.json]
// simulates a render loop and prints what a stats overlay would show.

use rand::prelude::*;
use rtstats::{config, error, frame_stats, logging, return_error};

fn main() -> error::Returns<()> {
    logging::init();
    let args = std::env::args().collect::<Vec<_>>();
    let telemetry_config = match args.len() {
        1 => config::make_default_telemetry_config(),
        2 => config::TelemetryConfig::from_path(&args[1])?,
        _ => {
            return_error!("usage: overlay [config.json]".into());
        }
    };
    let mut rng = match telemetry_config.seed {
        Some(seed) => rand_chacha::ChaCha20Rng::seed_from_u64(seed),
        None => rand_chacha::ChaCha20Rng::from_os_rng(),
    };

    let mut stats = frame_stats::FrameStats::new(&telemetry_config);
    let mut frame_num = 0u64;
    while telemetry_config.frame_count == 0 || frame_num < telemetry_config.frame_count {
        stats.begin_frame();
        let jitter = if telemetry_config.jitter_ms > 0.0 {
            rng.random_range(-telemetry_config.jitter_ms..=telemetry_config.jitter_ms)
        } else {
            0.0
        };
        let frame_ms = (telemetry_config.target_frame_ms + jitter).max(0.0);
        std::thread::sleep(std::time::Duration::from_secs_f64(frame_ms / 1000.0));
        stats.end_frame();
        frame_num += 1;

        if frame_num % telemetry_config.report_every == 0 {
            println!("{}", serde_json::to_string(&stats.snapshot())?);
        }
        std::thread::sleep(stats.pacing_delay(telemetry_config.paced_frame_rate));
        if telemetry_config.run_time_ms > 0
            && stats.elapsed() > std::time::Duration::from_millis(telemetry_config.run_time_ms)
        {
            tracing::info!(frame_num, "run time limit reached");
            break;
        }
    }
    stats.log_summary();

    Ok(())
}
