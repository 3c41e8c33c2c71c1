//! The single active modal.

use castlist_api_models::EntityId;

/// Modal currently shown over the lists. Opening one replaces the previous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    /// New movie form.
    AddMovie,
    /// Movie detail with its cast.
    ViewMovie {
        /// Target movie.
        movie_id: EntityId,
    },
    /// Movie edit form.
    EditMovie {
        /// Target movie.
        movie_id: EntityId,
    },
    /// New actor form.
    AddActor,
    /// Actor detail with filmography.
    ViewActor {
        /// Target actor.
        actor_id: EntityId,
    },
    /// Actor edit form.
    EditActor {
        /// Target actor.
        actor_id: EntityId,
    },
    /// Actor picker for a movie's cast.
    AddMovieActor {
        /// Movie receiving the actor.
        movie_id: EntityId,
    },
}

impl Modal {
    /// Stable action tag, used in logs.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::AddMovie => "addMovie",
            Self::ViewMovie { .. } => "viewMovie",
            Self::EditMovie { .. } => "editMovie",
            Self::AddActor => "addActor",
            Self::ViewActor { .. } => "viewActor",
            Self::EditActor { .. } => "editActor",
            Self::AddMovieActor { .. } => "addMovieActor",
        }
    }
}
