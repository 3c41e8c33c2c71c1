#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
//! Shared HTTP DTOs for the Castlist movie/actor API.
//!
//! These types are re-used by the core client and the CLI for request/response
//! encoding so the wire contract has a single source of truth. Relationship
//! lists (`Movie::actors`, `Actor::movies`) are owned by the server; the client
//! only ever replaces them wholesale from a fresh listing.
//!
//! Entities decoded from listings are lenient: the server stores release dates
//! and genders as free text, so a malformed value decodes as "unknown" instead
//! of failing the whole list. Drafts stay strict.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Upper bound accepted for an actor's age.
pub const MAX_ACTOR_AGE: u8 = 120;

/// Server-assigned identifier shared by movies and actors.
pub type EntityId = i64;

/// Gender options understood by the API, encoded as single-letter codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Encoded as `M`.
    #[serde(rename = "M")]
    Male,
    /// Encoded as `F`.
    #[serde(rename = "F")]
    Female,
    /// Encoded as `X`.
    #[serde(rename = "X")]
    NonBinary,
    /// Stored value was blank or unrecognised. Never accepted in a draft.
    #[serde(rename = "")]
    Unspecified,
}

impl Gender {
    /// Wire code for the variant.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::NonBinary => "X",
            Self::Unspecified => "",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "Non-binary",
            Self::Unspecified => "Unspecified",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Raised when a gender string matches none of the known codes or labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gender value")]
pub struct UnknownGender {
    /// Rejected input.
    pub value: String,
}

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "x" | "non-binary" | "nonbinary" => Ok(Self::NonBinary),
            _ => Err(UnknownGender {
                value: value.to_string(),
            }),
        }
    }
}

/// Actor reference embedded in a movie's cast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorRef {
    /// Actor identifier.
    pub id: EntityId,
    /// Actor display name.
    pub name: String,
}

/// Movie reference embedded in an actor's filmography.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRef {
    /// Movie identifier.
    pub id: EntityId,
    /// Movie title.
    pub title: String,
}

/// Movie as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// Server-assigned identifier.
    pub id: EntityId,
    /// Movie title.
    pub title: String,
    /// Release date, `YYYY-MM-DD` on the wire. `None` when the stored value
    /// is missing or unparseable.
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
    /// Cast, maintained server-side.
    #[serde(default)]
    pub actors: Vec<ActorRef>,
}

impl Movie {
    /// Reference form used when embedding this movie elsewhere.
    #[must_use]
    pub fn reference(&self) -> MovieRef {
        MovieRef {
            id: self.id,
            title: self.title.clone(),
        }
    }

    /// Whether the actor is already part of the cast.
    #[must_use]
    pub fn has_actor(&self, actor_id: EntityId) -> bool {
        self.actors.iter().any(|actor| actor.id == actor_id)
    }
}

/// Actor as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// Server-assigned identifier.
    pub id: EntityId,
    /// Actor name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Gender code.
    #[serde(default = "unspecified_gender", deserialize_with = "lenient_gender")]
    pub gender: Gender,
    /// Filmography, maintained server-side.
    #[serde(default)]
    pub movies: Vec<MovieRef>,
}

impl Actor {
    /// Reference form used for casting requests.
    #[must_use]
    pub fn reference(&self) -> ActorRef {
        ActorRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

const fn unspecified_gender() -> Gender {
    Gender::Unspecified
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    let raw = raw.trim();
    // Flask's default JSON encoder renders dates as RFC 2822 timestamps.
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|at| at.date_naive())))
}

fn lenient_gender<'de, D>(deserializer: D) -> Result<Gender, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.parse().unwrap_or(Gender::Unspecified))
}

/// Validation failures raised before a draft is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Movie title was empty or whitespace.
    #[error("movie title must not be empty")]
    BlankTitle,
    /// Actor name was empty or whitespace.
    #[error("actor name must not be empty")]
    BlankName,
    /// Actor age exceeded [`MAX_ACTOR_AGE`].
    #[error("actor age is out of range")]
    AgeOutOfRange {
        /// Rejected age.
        age: u8,
    },
    /// Actor gender was left unspecified.
    #[error("actor gender must be M, F or X")]
    MissingGender,
    /// The stored movie has no usable release date to carry into an edit.
    #[error("movie release date is missing")]
    MissingReleaseDate,
}

/// Movie fields submitted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDraft {
    /// Movie title.
    pub title: String,
    /// Release date.
    pub release_date: NaiveDate,
}

impl MovieDraft {
    /// Check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankTitle`] when the title is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        Ok(())
    }
}

impl TryFrom<&Movie> for MovieDraft {
    type Error = ValidationError;

    fn try_from(movie: &Movie) -> Result<Self, Self::Error> {
        Ok(Self {
            title: movie.title.clone(),
            release_date: movie
                .release_date
                .ok_or(ValidationError::MissingReleaseDate)?,
        })
    }
}

/// Actor fields submitted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorDraft {
    /// Actor name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Gender code.
    pub gender: Gender,
}

impl ActorDraft {
    /// Check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank name, an age above
    /// [`MAX_ACTOR_AGE`] or an unspecified gender.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.age > MAX_ACTOR_AGE {
            return Err(ValidationError::AgeOutOfRange { age: self.age });
        }
        if self.gender == Gender::Unspecified {
            return Err(ValidationError::MissingGender);
        }
        Ok(())
    }
}

impl From<&Actor> for ActorDraft {
    fn from(actor: &Actor) -> Self {
        Self {
            name: actor.name.clone(),
            age: actor.age,
            gender: actor.gender,
        }
    }
}

/// `GET /user` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionsEnvelope {
    /// Permissions granted to the bearer.
    pub permissions: Vec<String>,
}

/// `GET /movies` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoviesEnvelope {
    /// Every movie visible to the bearer.
    pub movies: Vec<Movie>,
}

/// Single-movie response for create, update and casting calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieEnvelope {
    /// The affected movie.
    pub movie: Movie,
}

/// `GET /actors` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorsEnvelope {
    /// Every actor visible to the bearer.
    pub actors: Vec<Actor>,
}

/// Single-actor response for create and update calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorEnvelope {
    /// The affected actor.
    pub actor: Actor,
}

/// Body for attaching or detaching an actor on `/movies/{id}/actors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastingRequest {
    /// Actor being attached or detached.
    pub actor: ActorRef,
}

/// Error document returned by the API on failure statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Always `false` for error documents.
    #[serde(default)]
    pub success: bool,
    /// HTTP status echoed by the server.
    pub error: u16,
    /// Short description such as `unauthorized`.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn movie_decodes_with_and_without_cast() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 3,
            "title": "Dune",
            "release_date": "2021-10-22",
            "actors": [{ "id": 9, "name": "Zendaya", "age": 25, "gender": "F" }]
        }))
        .expect("movie decodes");
        assert_eq!(movie.release_date, Some(date("2021-10-22")));
        assert!(movie.has_actor(9));
        assert!(!movie.has_actor(10));

        let bare: Movie = serde_json::from_value(json!({
            "id": 4,
            "title": "Arrival",
            "release_date": "2016-11-11"
        }))
        .expect("movie without cast decodes");
        assert!(bare.actors.is_empty());
    }

    #[test]
    fn malformed_stored_fields_decode_as_unknown() {
        let listing: MoviesEnvelope = serde_json::from_value(json!({
            "movies": [
                { "id": 1, "title": "Dune", "release_date": "2021-10-22" },
                { "id": 2, "title": "Draft", "release_date": "", "actors": [] },
                { "id": 3, "title": "Undated", "release_date": null },
                { "id": 4, "title": "Heat", "release_date": "Fri, 15 Dec 1995 00:00:00 GMT" }
            ]
        }))
        .expect("listing decodes");
        let dates: Vec<_> = listing.movies.iter().map(|movie| movie.release_date).collect();
        assert_eq!(
            dates,
            vec![Some(date("2021-10-22")), None, None, Some(date("1995-12-15"))]
        );
        assert_eq!(
            MovieDraft::try_from(&listing.movies[1]),
            Err(ValidationError::MissingReleaseDate)
        );

        let actors: ActorsEnvelope = serde_json::from_value(json!({
            "actors": [
                { "id": 1, "name": "Zendaya", "age": 25, "gender": "F" },
                { "id": 2, "name": "Nobody", "age": 40, "gender": "" },
                { "id": 3, "name": "Someone", "age": 33 }
            ]
        }))
        .expect("actors decode");
        let genders: Vec<_> = actors.actors.iter().map(|actor| actor.gender).collect();
        assert_eq!(
            genders,
            vec![Gender::Female, Gender::Unspecified, Gender::Unspecified]
        );
    }

    #[test]
    fn drafts_require_a_known_gender() {
        let draft = ActorDraft {
            name: "Nobody".into(),
            age: 40,
            gender: Gender::Unspecified,
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingGender));
    }

    #[test]
    fn gender_uses_single_letter_codes() {
        let encoded = serde_json::to_value(Gender::NonBinary).expect("encode");
        assert_eq!(encoded, json!("X"));
        let decoded: Gender = serde_json::from_value(json!("F")).expect("decode");
        assert_eq!(decoded, Gender::Female);
    }

    #[test]
    fn gender_parses_codes_and_labels() {
        assert_eq!("m".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("non-binary".parse::<Gender>(), Ok(Gender::NonBinary));
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn actor_draft_rejects_out_of_range_age() {
        let draft = ActorDraft {
            name: "Methuselah".into(),
            age: MAX_ACTOR_AGE + 1,
            gender: Gender::Male,
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::AgeOutOfRange {
                age: MAX_ACTOR_AGE + 1
            })
        );

        let ok = ActorDraft {
            age: MAX_ACTOR_AGE,
            ..draft
        };
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn drafts_reject_blank_text() {
        let movie = MovieDraft {
            title: "   ".into(),
            release_date: date("2020-01-01"),
        };
        assert_eq!(movie.validate(), Err(ValidationError::BlankTitle));

        let actor = ActorDraft {
            name: String::new(),
            age: 30,
            gender: Gender::Female,
        };
        assert_eq!(actor.validate(), Err(ValidationError::BlankName));
    }

    #[test]
    fn casting_request_wraps_actor_reference() {
        let actor = Actor {
            id: 7,
            name: "Oscar Isaac".into(),
            age: 42,
            gender: Gender::Male,
            movies: Vec::new(),
        };
        let body = serde_json::to_value(CastingRequest {
            actor: actor.reference(),
        })
        .expect("encode");
        assert_eq!(body, json!({ "actor": { "id": 7, "name": "Oscar Isaac" } }));
    }

    #[test]
    fn error_envelope_tolerates_missing_success_flag() {
        let envelope: ErrorEnvelope =
            serde_json::from_value(json!({ "error": 401, "message": "unauthorized" }))
                .expect("decode");
        assert!(!envelope.success);
        assert_eq!(envelope.error, 401);
    }
}
