// Copyright (C) 2020-2026 Andy Kurnia.

// for binaries. RUST_LOG overrides the default level.
// logs go to stderr so stdout stays machine readable.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
