//! Container state and the read-only store view handed to presentation.
//!
//! # Design
//! - Lists are replaced wholesale after every mutation; nothing here patches
//!   relationship data locally.
//! - Views resolve ids against the current lists, so a modal whose target
//!   disappeared in a refresh simply resolves to nothing.

use castlist_api_models::{Actor, EntityId, Movie};

use crate::config::AppConfig;
use crate::modal::Modal;
use crate::permissions::PermissionSet;

/// Mutable state owned by [`crate::App`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Bearer token; `None` means logged out.
    pub token: Option<String>,
    /// Permissions granted to the token.
    pub permissions: PermissionSet,
    /// Last fetched movie list.
    pub movies: Vec<Movie>,
    /// Last fetched actor list.
    pub actors: Vec<Actor>,
    /// Active modal, if any.
    pub modal: Option<Modal>,
}

/// Modal resolved against the current lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalView<'a> {
    /// New movie form.
    AddMovie,
    /// Movie detail.
    ViewMovie(&'a Movie),
    /// Movie edit form, pre-filled.
    EditMovie(&'a Movie),
    /// New actor form.
    AddActor,
    /// Actor detail.
    ViewActor(&'a Actor),
    /// Actor edit form, pre-filled.
    EditActor(&'a Actor),
    /// Actor picker for a movie.
    AddMovieActor {
        /// Movie receiving the actor.
        movie: &'a Movie,
        /// Actors not yet in the cast.
        candidates: Vec<&'a Actor>,
    },
}

/// Read-only view over the container state.
#[derive(Clone, Copy, Debug)]
pub struct Store<'a> {
    state: &'a AppState,
    config: &'a AppConfig,
}

impl<'a> Store<'a> {
    pub(crate) const fn new(state: &'a AppState, config: &'a AppConfig) -> Self {
        Self { state, config }
    }

    /// Whether a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    /// Permission predicate.
    #[must_use]
    pub fn can(&self, permission: &str) -> bool {
        self.state.permissions.can(permission)
    }

    /// Granted permissions.
    #[must_use]
    pub const fn permissions(&self) -> &'a PermissionSet {
        &self.state.permissions
    }

    /// Current movie list.
    #[must_use]
    pub fn movies(&self) -> &'a [Movie] {
        &self.state.movies
    }

    /// Current actor list.
    #[must_use]
    pub fn actors(&self) -> &'a [Actor] {
        &self.state.actors
    }

    /// Active modal.
    #[must_use]
    pub const fn modal(&self) -> Option<Modal> {
        self.state.modal
    }

    /// Login affordance target.
    #[must_use]
    pub const fn login_url(&self) -> &'a url::Url {
        &self.config.login_url
    }

    /// Logout target.
    #[must_use]
    pub const fn logout_url(&self) -> &'a url::Url {
        &self.config.logout_url
    }

    /// Movie by id.
    #[must_use]
    pub fn movie(&self, id: EntityId) -> Option<&'a Movie> {
        find_movie(&self.state.movies, id)
    }

    /// Actor by id.
    #[must_use]
    pub fn actor(&self, id: EntityId) -> Option<&'a Actor> {
        find_actor(&self.state.actors, id)
    }

    /// Actors that can still be attached to the movie.
    #[must_use]
    pub fn free_actors(&self, movie_id: EntityId) -> Vec<&'a Actor> {
        self.movie(movie_id)
            .map(|movie| free_actors(movie, &self.state.actors))
            .unwrap_or_default()
    }

    /// Active modal resolved against the current lists.
    #[must_use]
    pub fn modal_view(&self) -> Option<ModalView<'a>> {
        match self.state.modal? {
            Modal::AddMovie => Some(ModalView::AddMovie),
            Modal::AddActor => Some(ModalView::AddActor),
            Modal::ViewMovie { movie_id } => self.movie(movie_id).map(ModalView::ViewMovie),
            Modal::EditMovie { movie_id } => self.movie(movie_id).map(ModalView::EditMovie),
            Modal::ViewActor { actor_id } => self.actor(actor_id).map(ModalView::ViewActor),
            Modal::EditActor { actor_id } => self.actor(actor_id).map(ModalView::EditActor),
            Modal::AddMovieActor { movie_id } => {
                self.movie(movie_id).map(|movie| ModalView::AddMovieActor {
                    movie,
                    candidates: free_actors(movie, &self.state.actors),
                })
            }
        }
    }
}

/// Movie with the given id.
#[must_use]
pub fn find_movie(movies: &[Movie], id: EntityId) -> Option<&Movie> {
    movies.iter().find(|movie| movie.id == id)
}

/// Actor with the given id.
#[must_use]
pub fn find_actor(actors: &[Actor], id: EntityId) -> Option<&Actor> {
    actors.iter().find(|actor| actor.id == id)
}

/// Actors whose id is not already in the movie's cast, in list order.
#[must_use]
pub fn free_actors<'a>(movie: &Movie, actors: &'a [Actor]) -> Vec<&'a Actor> {
    actors
        .iter()
        .filter(|actor| !movie.has_actor(actor.id))
        .collect()
}
