// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, resolve settings, run one session.
// - Every failure is reported as a single `Error: ...` line and the process
//   still exits normally.

use movie_lookup::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so they never interleave with the dialogue on stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = Settings::from_env();
    tracing::debug!(?settings, "starting lookup");

    if let Err(err) = movie_lookup::run(&settings) {
        eprintln!("Error: {err}");
    }
}
