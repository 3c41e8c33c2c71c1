//! Command handlers grouped by concern.

pub(crate) mod actors;
pub(crate) mod cast;
pub(crate) mod movies;
pub(crate) mod session;

use anyhow::anyhow;
use castlist_core::{ApiClient, App, Host, SessionStatus, SessionStorage};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::output::render_modal;

/// Container wired to the HTTP API; host and storage vary between the
/// terminal and tests.
pub(crate) type CastApp<H, S> = App<ApiClient, H, S>;

/// Load permissions and both lists, failing unless the session is usable.
pub(crate) async fn ensure_active<H, S>(app: &mut CastApp<H, S>) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    match app.load_data().await? {
        SessionStatus::Active => Ok(()),
        SessionStatus::LoggedOut => Err(CliError::validation(
            "not logged in (run `castlist login`)",
        )),
        SessionStatus::Expired => Err(CliError::failure(anyhow!(
            "session expired and was cleared; log in again with `castlist login`"
        ))),
    }
}

/// Refuse the command unless the session holds `permission`.
pub(crate) fn require<H, S>(app: &CastApp<H, S>, permission: &str) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    if app.can(permission) {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "permission '{permission}' is required for this command"
        )))
    }
}

/// Render whatever the active modal currently shows.
pub(crate) fn show_modal<H, S>(app: &CastApp<H, S>, format: OutputFormat) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    let store = app.store();
    let view = store
        .modal_view()
        .ok_or_else(|| CliError::validation("the selected record no longer exists"))?;
    render_modal(&view, format)
}
