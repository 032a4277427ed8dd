// Library root
// -----------
// The binary (`main.rs`) is a thin shell over this crate; the modules can
// be driven directly from tests.
//
// Module responsibilities:
// - `config`: run settings and the credential file loader.
// - `api`: request target building and the blocking TMDB client.
// - `ui`: the interactive search/select/details dialogue.
// - `output`: writes the raw payloads to the output file.
// - `error`: the error type every layer returns.
pub mod api;
pub mod config;
pub mod error;
pub mod output;
pub mod ui;

pub use error::{Error, Result};

use api::TmdbClient;
use config::Settings;
use ui::{Outcome, Session, TerminalPrompt};

/// Run one lookup against the real service on the current terminal.
pub fn run(settings: &Settings) -> Result<Outcome> {
    let client = TmdbClient::new(settings.base_url.clone())?;
    let mut session = Session::new(settings, &client, TerminalPrompt, std::io::stdout().lock())
        .with_progress(true);
    session.run()
}
