//! Application state container.
//!
//! # Design
//! - Every mutation calls the API, then re-fetches the affected list before
//!   any view of the entity is shown again; nothing is patched optimistically.
//! - Startup fetches permissions, movies and actors concurrently; any failure
//!   in that batch is treated as an expired session and logs out.
//! - Mutations take `&mut self`, so they are serialised by construction.

use castlist_api_models::{Actor, ActorDraft, ActorRef, EntityId, Movie, MovieDraft};
use tracing::{debug, info, warn};
use url::Url;

use crate::api::CastingApi;
use crate::auth::{Session, extract_token};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::host::{AUTH_STORAGE_KEY, Host, SessionStorage};
use crate::modal::Modal;
use crate::permissions::PermissionSet;
use crate::store::{AppState, Store, find_actor, find_movie};

/// Outcome of loading the authenticated data set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token is held; only the login affordance applies.
    LoggedOut,
    /// Permissions and both lists were loaded.
    Active,
    /// The startup batch failed and the session was logged out.
    Expired,
}

/// Result of a delete request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Declined,
    /// The delete was sent and the list re-fetched.
    Deleted,
}

/// Client-side state container driving the movie/actor administration flow.
pub struct App<A, H, S> {
    config: AppConfig,
    api: A,
    host: H,
    storage: S,
    state: AppState,
}

impl<A, H, S> App<A, H, S>
where
    A: CastingApi,
    H: Host,
    S: SessionStorage,
{
    /// Build a logged-out container.
    pub fn new(config: AppConfig, api: A, host: H, storage: S) -> Self {
        Self {
            config,
            api,
            host,
            storage,
            state: AppState::default(),
        }
    }

    /// Seed the token the host already holds (for example from session storage).
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.state.token = token.filter(|token| !token.trim().is_empty());
        self
    }

    /// Current state.
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Read-only view for presentation.
    pub const fn store(&self) -> Store<'_> {
        Store::new(&self.state, &self.config)
    }

    /// Bootstrap configuration.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Host capabilities.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Session storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Permission predicate.
    pub fn can(&self, permission: &str) -> bool {
        self.state.permissions.can(permission)
    }

    /// Open a modal, replacing any open one.
    pub fn modal_on(&mut self, modal: Modal) {
        debug!(action = modal.action(), "modal opened");
        self.state.modal = Some(modal);
    }

    /// Close the active modal.
    pub fn modal_off(&mut self) {
        self.state.modal = None;
    }

    /// Mount against the current location.
    ///
    /// A token in the URL fragment is persisted and the location is replaced
    /// with the application URL before the data set is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when the token cannot be persisted or
    /// cleared.
    pub async fn mount(&mut self, current_url: &Url) -> AppResult<SessionStatus> {
        if let Some(token) = extract_token(current_url) {
            self.storage
                .set(AUTH_STORAGE_KEY, &token)
                .map_err(AppError::storage("persist_token"))?;
            self.state.token = Some(token);
            self.host.replace_location(&self.config.app_url);
            info!("access token captured from redirect");
        }
        self.load_data().await
    }

    /// Fetch permissions, movies and actors concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when logging out after a failed batch
    /// cannot clear the stored token.
    pub async fn load_data(&mut self) -> AppResult<SessionStatus> {
        let Some(session) = self.session() else {
            debug!("no token held; staying logged out");
            return Ok(SessionStatus::LoggedOut);
        };

        let batch = tokio::try_join!(
            self.api.permissions(&session),
            self.api.movies(&session),
            self.api.actors(&session),
        );

        match batch {
            Ok((permissions, movies, actors)) => {
                self.state.permissions = permissions.into_iter().collect::<PermissionSet>();
                self.state.movies = movies;
                self.state.actors = actors;
                debug!(
                    movies = self.state.movies.len(),
                    actors = self.state.actors.len(),
                    "session data loaded"
                );
                Ok(SessionStatus::Active)
            }
            Err(err) => {
                warn!(
                    status = ?err.status(),
                    error = %err.detail(),
                    "startup fetch failed; logging out"
                );
                self.logout()?;
                Ok(SessionStatus::Expired)
            }
        }
    }

    /// Send the user to the login page.
    pub fn login(&self) {
        self.host.redirect(&self.config.login_url);
    }

    /// Clear the stored token and in-memory state, then send the user to the
    /// logout page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] when the stored token cannot be removed;
    /// the redirect still happens.
    pub fn logout(&mut self) -> AppResult<()> {
        let removed = self.storage.remove(AUTH_STORAGE_KEY);
        self.state = AppState::default();
        self.host.redirect(&self.config.logout_url);
        info!("session logged out");
        removed.map_err(AppError::storage("clear_token"))
    }

    /// Re-fetch the movie list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] without a token, or
    /// [`AppError::Api`] when the listing fails.
    pub async fn refresh_movies(&mut self) -> AppResult<()> {
        let session = self.require_session()?;
        self.state.movies = self
            .api
            .movies(&session)
            .await
            .map_err(AppError::api("list_movies"))?;
        Ok(())
    }

    /// Re-fetch the actor list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] without a token, or
    /// [`AppError::Api`] when the listing fails.
    pub async fn refresh_actors(&mut self) -> AppResult<()> {
        let session = self.require_session()?;
        self.state.actors = self
            .api
            .actors(&session)
            .await
            .map_err(AppError::api("list_actors"))?;
        Ok(())
    }

    /// Create a movie. The modal closes before the request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid draft, or the error of
    /// the create call or the list refresh.
    pub async fn add_movie(&mut self, draft: MovieDraft) -> AppResult<Movie> {
        self.modal_off();
        draft
            .validate()
            .map_err(|source| AppError::Validation { source })?;
        let session = self.require_session()?;
        let movie = self
            .api
            .create_movie(&session, &draft)
            .await
            .map_err(AppError::api("create_movie"))?;
        self.refresh_movies().await?;
        Ok(movie)
    }

    /// Update a movie, refresh the list and open its detail view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid draft, or the error of
    /// the update call or the list refresh.
    pub async fn save_movie(&mut self, id: EntityId, draft: MovieDraft) -> AppResult<Movie> {
        draft
            .validate()
            .map_err(|source| AppError::Validation { source })?;
        let session = self.require_session()?;
        let movie = self
            .api
            .update_movie(&session, id, &draft)
            .await
            .map_err(AppError::api("update_movie"))?;
        self.refresh_movies().await?;
        self.modal_on(Modal::ViewMovie { movie_id: movie.id });
        Ok(movie)
    }

    /// Delete a movie after the user confirms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id, or the error of the
    /// list refresh.
    pub async fn delete_movie(&mut self, id: EntityId) -> AppResult<DeleteOutcome> {
        let title = find_movie(&self.state.movies, id)
            .map(|movie| movie.title.clone())
            .ok_or(AppError::NotFound { kind: "movie", id })?;
        if !self.confirm_delete(&title) {
            return Ok(DeleteOutcome::Declined);
        }
        let session = self.require_session()?;
        self.api.delete_movie(&session, id).await;
        self.refresh_movies().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Create an actor. The modal closes before the request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid draft, or the error of
    /// the create call or the list refresh.
    pub async fn add_actor(&mut self, draft: ActorDraft) -> AppResult<Actor> {
        self.modal_off();
        draft
            .validate()
            .map_err(|source| AppError::Validation { source })?;
        let session = self.require_session()?;
        let actor = self
            .api
            .create_actor(&session, &draft)
            .await
            .map_err(AppError::api("create_actor"))?;
        self.refresh_actors().await?;
        Ok(actor)
    }

    /// Update an actor, refresh the list and open its detail view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid draft, or the error of
    /// the update call or the list refresh.
    pub async fn save_actor(&mut self, id: EntityId, draft: ActorDraft) -> AppResult<Actor> {
        draft
            .validate()
            .map_err(|source| AppError::Validation { source })?;
        let session = self.require_session()?;
        let actor = self
            .api
            .update_actor(&session, id, &draft)
            .await
            .map_err(AppError::api("update_actor"))?;
        self.refresh_actors().await?;
        self.modal_on(Modal::ViewActor { actor_id: actor.id });
        Ok(actor)
    }

    /// Delete an actor after the user confirms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id, or the error of the
    /// list refresh.
    pub async fn delete_actor(&mut self, id: EntityId) -> AppResult<DeleteOutcome> {
        let name = find_actor(&self.state.actors, id)
            .map(|actor| actor.name.clone())
            .ok_or(AppError::NotFound { kind: "actor", id })?;
        if !self.confirm_delete(&name) {
            return Ok(DeleteOutcome::Declined);
        }
        let session = self.require_session()?;
        self.api.delete_actor(&session, id).await;
        self.refresh_actors().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Attach an actor to a movie, refresh movies and open the movie view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown actor, or the error of
    /// the attach call or the list refresh.
    pub async fn add_movie_actor(
        &mut self,
        movie_id: EntityId,
        actor_id: EntityId,
    ) -> AppResult<Movie> {
        let actor = find_actor(&self.state.actors, actor_id)
            .map(Actor::reference)
            .ok_or(AppError::NotFound {
                kind: "actor",
                id: actor_id,
            })?;
        let session = self.require_session()?;
        let movie = self
            .api
            .add_movie_actor(&session, movie_id, &actor)
            .await
            .map_err(AppError::api("add_movie_actor"))?;
        self.refresh_movies().await?;
        self.modal_on(Modal::ViewMovie { movie_id: movie.id });
        Ok(movie)
    }

    /// Detach an actor from a movie, refresh movies and open the movie view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when neither the cast nor the actor list
    /// knows the actor, or the error of the list refresh.
    pub async fn remove_movie_actor(
        &mut self,
        movie_id: EntityId,
        actor_id: EntityId,
    ) -> AppResult<()> {
        let actor = self.cast_reference(movie_id, actor_id).ok_or(AppError::NotFound {
            kind: "actor",
            id: actor_id,
        })?;
        let session = self.require_session()?;
        self.api
            .remove_movie_actor(&session, movie_id, &actor)
            .await;
        self.refresh_movies().await?;
        self.modal_on(Modal::ViewMovie { movie_id });
        Ok(())
    }

    fn session(&self) -> Option<Session> {
        self.state
            .token
            .clone()
            .map(|token| Session::new(self.config.api_url.clone(), Some(token)))
    }

    fn require_session(&self) -> AppResult<Session> {
        self.session().ok_or(AppError::NotAuthenticated)
    }

    fn confirm_delete(&self, label: &str) -> bool {
        let confirmed = self
            .host
            .confirm(&format!("Are you sure you want to delete\n{label}"));
        if !confirmed {
            debug!(label, "delete declined");
        }
        confirmed
    }

    fn cast_reference(&self, movie_id: EntityId, actor_id: EntityId) -> Option<ActorRef> {
        find_movie(&self.state.movies, movie_id)
            .and_then(|movie| movie.actors.iter().find(|actor| actor.id == actor_id))
            .cloned()
            .or_else(|| find_actor(&self.state.actors, actor_id).map(Actor::reference))
    }
}
