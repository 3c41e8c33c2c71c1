use castlist_core::permissions::MOVIES_UPDATE;
use castlist_core::{Host, Modal, SessionStorage};

use crate::cli::{CandidatesArgs, CastArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{CastApp, ensure_active, require, show_modal};

pub(crate) async fn handle_cast_add<H, S>(
    app: &mut CastApp<H, S>,
    args: CastArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, MOVIES_UPDATE)?;

    app.modal_on(Modal::AddMovieActor {
        movie_id: args.movie,
    });
    app.add_movie_actor(args.movie, args.actor).await?;
    show_modal(app, format)
}

pub(crate) async fn handle_cast_remove<H, S>(
    app: &mut CastApp<H, S>,
    args: CastArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, MOVIES_UPDATE)?;

    app.remove_movie_actor(args.movie, args.actor).await?;
    show_modal(app, format)
}

pub(crate) async fn handle_cast_candidates<H, S>(
    app: &mut CastApp<H, S>,
    args: CandidatesArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    if app.store().movie(args.movie).is_none() {
        return Err(CliError::validation(format!("movie {} not found", args.movie)));
    }
    app.modal_on(Modal::AddMovieActor {
        movie_id: args.movie,
    });
    show_modal(app, format)
}
