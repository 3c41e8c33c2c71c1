//! Entity builders and JSON envelopes matching the API wire format.

use castlist_api_models::{Actor, ActorRef, EntityId, Gender, Movie, MovieRef};
use chrono::NaiveDate;
use serde_json::{Value, json};

/// Every mutation permission the API can grant.
pub const ALL_PERMISSIONS: [&str; 6] = [
    "movies:create",
    "movies:update",
    "movies:delete",
    "actors:create",
    "actors:update",
    "actors:delete",
];

/// Parse a `YYYY-MM-DD` literal, falling back to the Unix epoch on bad input.
#[must_use]
pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_default()
}

/// Movie with an empty cast.
#[must_use]
pub fn movie(id: EntityId, title: &str, release_date: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        release_date: Some(date(release_date)),
        actors: Vec::new(),
    }
}

/// Movie whose cast lists the given actors.
#[must_use]
pub fn movie_with_cast(id: EntityId, title: &str, release_date: &str, cast: &[&Actor]) -> Movie {
    Movie {
        actors: cast.iter().map(|actor| actor.reference()).collect(),
        ..movie(id, title, release_date)
    }
}

/// Actor with an empty filmography.
#[must_use]
pub fn actor(id: EntityId, name: &str, age: u8, gender: Gender) -> Actor {
    Actor {
        id,
        name: name.to_string(),
        age,
        gender,
        movies: Vec::new(),
    }
}

/// Actor credited in the given movies.
#[must_use]
pub fn actor_in(id: EntityId, name: &str, age: u8, gender: Gender, movies: &[&Movie]) -> Actor {
    Actor {
        movies: movies.iter().map(|movie| movie.reference()).collect(),
        ..actor(id, name, age, gender)
    }
}

/// Reference form of an actor.
#[must_use]
pub fn actor_ref(id: EntityId, name: &str) -> ActorRef {
    ActorRef {
        id,
        name: name.to_string(),
    }
}

/// Reference form of a movie.
#[must_use]
pub fn movie_ref(id: EntityId, title: &str) -> MovieRef {
    MovieRef {
        id,
        title: title.to_string(),
    }
}

/// `{ "permissions": [...] }`.
#[must_use]
pub fn permissions_body(permissions: &[&str]) -> Value {
    json!({ "permissions": permissions })
}

/// `{ "movies": [...] }`.
#[must_use]
pub fn movies_body(movies: &[Movie]) -> Value {
    json!({ "movies": movies })
}

/// `{ "movie": {...} }`.
#[must_use]
pub fn movie_body(movie: &Movie) -> Value {
    json!({ "movie": movie })
}

/// `{ "actors": [...] }`.
#[must_use]
pub fn actors_body(actors: &[Actor]) -> Value {
    json!({ "actors": actors })
}

/// `{ "actor": {...} }`.
#[must_use]
pub fn actor_body(actor: &Actor) -> Value {
    json!({ "actor": actor })
}

/// Error document in the API's `{ success, error, message }` shape.
#[must_use]
pub fn error_body(status: u16, message: &str) -> Value {
    json!({ "success": false, "error": status, "message": message })
}
