mod app;
mod cli;

use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so the progress output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    app::run(cli::parse());
}
