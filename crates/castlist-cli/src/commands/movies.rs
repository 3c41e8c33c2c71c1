use castlist_api_models::MovieDraft;
use castlist_core::permissions::{MOVIES_CREATE, MOVIES_DELETE, MOVIES_UPDATE};
use castlist_core::{DeleteOutcome, Host, Modal, SessionStorage};

use crate::cli::{IdArgs, MovieAddArgs, MovieEditArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{CastApp, ensure_active, require, show_modal};
use crate::output::{render_movie, render_movies};

pub(crate) async fn handle_movie_list<H, S>(
    app: &mut CastApp<H, S>,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    render_movies(app.store().movies(), format)
}

pub(crate) async fn handle_movie_show<H, S>(
    app: &mut CastApp<H, S>,
    args: IdArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    if app.store().movie(args.id).is_none() {
        return Err(CliError::validation(format!("movie {} not found", args.id)));
    }
    app.modal_on(Modal::ViewMovie { movie_id: args.id });
    show_modal(app, format)
}

pub(crate) async fn handle_movie_add<H, S>(
    app: &mut CastApp<H, S>,
    args: MovieAddArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, MOVIES_CREATE)?;

    app.modal_on(Modal::AddMovie);
    let movie = app
        .add_movie(MovieDraft {
            title: args.title,
            release_date: args.release_date,
        })
        .await?;
    render_movie(&movie, format)
}

pub(crate) async fn handle_movie_edit<H, S>(
    app: &mut CastApp<H, S>,
    args: MovieEditArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, MOVIES_UPDATE)?;

    let stored = app
        .store()
        .movie(args.id)
        .ok_or_else(|| CliError::validation(format!("movie {} not found", args.id)))?;
    let release_date = args.release_date.or(stored.release_date).ok_or_else(|| {
        CliError::validation(format!(
            "movie {} has no stored release date; pass --release-date",
            args.id
        ))
    })?;
    let draft = MovieDraft {
        title: args.title.unwrap_or_else(|| stored.title.clone()),
        release_date,
    };

    app.modal_on(Modal::EditMovie { movie_id: args.id });
    app.save_movie(args.id, draft).await?;
    show_modal(app, format)
}

pub(crate) async fn handle_movie_remove<H, S>(
    app: &mut CastApp<H, S>,
    args: IdArgs,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, MOVIES_DELETE)?;

    match app.delete_movie(args.id).await? {
        DeleteOutcome::Deleted => println!("Deleted movie {}", args.id),
        DeleteOutcome::Declined => println!("Delete cancelled"),
    }
    Ok(())
}
