// Copyright (C) 2020-2026 Andy Kurnia.

// reduce [samples_per_thread] [seed]
// each thread accumulates its own statistics, which are then combined.

use rand::prelude::*;
use rtstats::{error, logging, return_error, stats};
use std::str::FromStr;

type Pv = stats::ParallelVariance<f64>;

// Irwin-Hall, close enough to normal for a demo.
fn gen_frame_time_ms(rng: &mut impl Rng) -> f64 {
    let u = (0..12).map(|_| rng.random::<f64>()).sum::<f64>();
    16.667 + 2.0 * (u - 6.0)
}

fn summarize(pv: &Pv) -> serde_json::Value {
    serde_json::json!({
        "weight": pv.weight(),
        "mean": pv.mean(),
        "population_variance": pv.population_variance(),
        "sample_variance": pv.sample_variance(),
        "standard_deviation": pv.standard_deviation(),
    })
}

fn main() -> error::Returns<()> {
    logging::init();
    let args = std::env::args().collect::<Vec<_>>();
    if args.len() > 3 {
        return_error!("usage: reduce [samples_per_thread] [seed]".into());
    }
    let samples_per_thread = match args.get(1) {
        Some(s) => usize::from_str(s)?,
        None => 100_000,
    };
    let seed = match args.get(2) {
        Some(s) => u64::from_str(s)?,
        None => rand_chacha::ChaCha20Rng::from_os_rng().random::<u64>(),
    };
    let num_threads = num_cpus::get();
    tracing::info!(num_threads, samples_per_thread, seed, "reducing");

    let mut threads = vec![];
    let (tx, rx) = std::sync::mpsc::channel();
    for thread_idx in 0..num_threads {
        let tx = tx.clone();
        threads.push(std::thread::spawn(move || {
            let mut rng =
                rand_chacha::ChaCha20Rng::seed_from_u64(seed.wrapping_add(thread_idx as u64));
            let samples = (0..samples_per_thread)
                .map(|_| gen_frame_time_ms(&mut rng))
                .collect::<Vec<_>>();
            let pv = samples.iter().copied().collect::<Pv>();
            // the receiver outlives every sender.
            let _ = tx.send((thread_idx, pv, samples));
        }));
    }
    drop(tx);

    let mut results = rx.iter().collect::<Vec<_>>();
    for thread in threads {
        if thread.join().is_err() {
            return_error!("worker thread panicked".into());
        }
    }
    results.sort_unstable_by_key(|&(thread_idx, _, _)| thread_idx);

    let forward = results
        .iter()
        .fold(Pv::new(), |acc, (_, pv, _)| Pv::combine(&acc, pv));
    let reverse = results
        .iter()
        .rev()
        .fold(Pv::new(), |acc, (_, pv, _)| Pv::combine(pv, &acc));
    let sequential = results
        .iter()
        .flat_map(|(_, _, samples)| samples.iter().copied())
        .collect::<Pv>();

    let ret = serde_json::json!({
        "threads": num_threads,
        "samples_per_thread": samples_per_thread,
        "seed": seed,
        "per_thread": results.iter().map(|(_, pv, _)| *pv).collect::<Vec<_>>(),
        "forward": summarize(&forward),
        "reverse": summarize(&reverse),
        "sequential": summarize(&sequential),
        "max_mean_diff": (forward.mean() - sequential.mean())
            .abs()
            .max((reverse.mean() - sequential.mean()).abs()),
        "max_variance_diff": (forward.population_variance() - sequential.population_variance())
            .abs()
            .max((reverse.population_variance() - sequential.population_variance()).abs()),
    });
    println!("{}", serde_json::to_string_pretty(&ret)?);

    Ok(())
}
