//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use castlist_api_models::{Actor, Movie};
use castlist_core::{ModalView, PermissionSet};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_movies(movies: &[Movie], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&movies)?,
        OutputFormat::Table => print!("{}", movie_table(movies)),
    }
    Ok(())
}

pub(crate) fn render_actors(actors: &[Actor], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&actors)?,
        OutputFormat::Table => print!("{}", actor_table(actors)),
    }
    Ok(())
}

pub(crate) fn render_movie(movie: &Movie, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(movie)?,
        OutputFormat::Table => print!("{}", movie_detail(movie)),
    }
    Ok(())
}

pub(crate) fn render_actor(actor: &Actor, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(actor)?,
        OutputFormat::Table => print!("{}", actor_detail(actor)),
    }
    Ok(())
}

pub(crate) fn render_permissions(
    permissions: &PermissionSet,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&permissions.iter().collect::<Vec<_>>())?,
        OutputFormat::Table => println!("{}", permissions_line(permissions)),
    }
    Ok(())
}

pub(crate) fn render_modal(view: &ModalView<'_>, format: OutputFormat) -> CliResult<()> {
    match view {
        ModalView::ViewMovie(movie) | ModalView::EditMovie(movie) => render_movie(movie, format),
        ModalView::ViewActor(actor) | ModalView::EditActor(actor) => render_actor(actor, format),
        ModalView::AddMovieActor { movie, candidates } => match format {
            OutputFormat::Json => print_json(&json!({
                "movie": movie,
                "candidates": candidates,
            })),
            OutputFormat::Table => {
                print!("{}", candidate_table(movie, candidates));
                Ok(())
            }
        },
        ModalView::AddMovie => {
            println!("new movie: --title <TITLE> --release-date <YYYY-MM-DD>");
            Ok(())
        }
        ModalView::AddActor => {
            println!("new actor: --name <NAME> --age <AGE> --gender <M|F|X>");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

#[must_use]
pub(crate) fn permissions_line(permissions: &PermissionSet) -> String {
    if permissions.is_empty() {
        return "You can: (nothing)".to_string();
    }
    let granted: Vec<&str> = permissions.iter().collect();
    format!("You can: {}", granted.join(", "))
}

fn released(movie: &Movie) -> String {
    movie
        .release_date
        .map_or_else(|| "unknown".to_string(), |date| date.to_string())
}

#[must_use]
pub(crate) fn movie_table(movies: &[Movie]) -> String {
    let mut out = format!("{:>6} {:<12} {:>5} TITLE\n", "ID", "RELEASED", "CAST");
    for movie in movies {
        let _ = writeln!(
            out,
            "{:>6} {:<12} {:>5} {}",
            movie.id,
            released(movie),
            movie.actors.len(),
            movie.title
        );
    }
    out
}

#[must_use]
pub(crate) fn actor_table(actors: &[Actor]) -> String {
    let mut out = format!(
        "{:>6} {:>4} {:<11} {:>6} NAME\n",
        "ID", "AGE", "GENDER", "MOVIES"
    );
    for actor in actors {
        let _ = writeln!(
            out,
            "{:>6} {:>4} {:<11} {:>6} {}",
            actor.id,
            actor.age,
            actor.gender.label(),
            actor.movies.len(),
            actor.name
        );
    }
    out
}

#[must_use]
pub(crate) fn movie_detail(movie: &Movie) -> String {
    let mut out = format!(
        "id: {}\ntitle: {}\nreleased: {}\n",
        movie.id,
        movie.title,
        released(movie)
    );
    if movie.actors.is_empty() {
        out.push_str("cast: (none)\n");
    } else {
        out.push_str("cast:\n");
        for actor in &movie.actors {
            let _ = writeln!(out, "  {:>6} {}", actor.id, actor.name);
        }
    }
    out
}

#[must_use]
pub(crate) fn actor_detail(actor: &Actor) -> String {
    let mut out = format!(
        "id: {}\nname: {}\nage: {}\ngender: {}\n",
        actor.id,
        actor.name,
        actor.age,
        actor.gender.label()
    );
    if actor.movies.is_empty() {
        out.push_str("movies: (none)\n");
    } else {
        out.push_str("movies:\n");
        for movie in &actor.movies {
            let _ = writeln!(out, "  {:>6} {}", movie.id, movie.title);
        }
    }
    out
}

#[must_use]
pub(crate) fn candidate_table(movie: &Movie, candidates: &[&Actor]) -> String {
    let mut out = format!("actors available for {} ({}):\n", movie.title, movie.id);
    if candidates.is_empty() {
        out.push_str("  (none)\n");
    }
    for actor in candidates {
        let _ = writeln!(out, "  {:>6} {}", actor.id, actor.name);
    }
    out
}
