// Copyright (C) 2020-2026 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod clock;
pub mod config;
pub mod float;
pub mod frame_stats;
pub mod logging;
pub mod moving_average;
pub mod realtime_value;
pub mod rlhelper;
pub mod stats;
