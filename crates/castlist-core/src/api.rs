//! HTTP client for the movie/actor API.
//!
//! # Design
//! - Every call receives the [`Session`] explicitly; the client itself only
//!   owns the connection pool.
//! - Envelopes are unwrapped here so callers work with bare entities.
//! - Delete failures are logged and swallowed; callers always re-fetch.

use async_trait::async_trait;
use castlist_api_models::{
    Actor, ActorDraft, ActorEnvelope, ActorRef, ActorsEnvelope, CastingRequest, EntityId, Movie,
    MovieDraft, MovieEnvelope, MoviesEnvelope, PermissionsEnvelope,
};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Session;
use crate::error::{ApiError, ApiResult, ErrorBody};

/// Operations the state container needs from the backend.
#[async_trait]
pub trait CastingApi: Send + Sync {
    /// Permissions granted to the session's bearer.
    async fn permissions(&self, session: &Session) -> ApiResult<Vec<String>>;

    /// Every movie.
    async fn movies(&self, session: &Session) -> ApiResult<Vec<Movie>>;

    /// Create a movie and return the stored record.
    async fn create_movie(&self, session: &Session, draft: &MovieDraft) -> ApiResult<Movie>;

    /// Update a movie and return the stored record.
    async fn update_movie(
        &self,
        session: &Session,
        id: EntityId,
        draft: &MovieDraft,
    ) -> ApiResult<Movie>;

    /// Delete a movie. Failures are not reported.
    async fn delete_movie(&self, session: &Session, id: EntityId);

    /// Every actor.
    async fn actors(&self, session: &Session) -> ApiResult<Vec<Actor>>;

    /// Create an actor and return the stored record.
    async fn create_actor(&self, session: &Session, draft: &ActorDraft) -> ApiResult<Actor>;

    /// Update an actor and return the stored record.
    async fn update_actor(
        &self,
        session: &Session,
        id: EntityId,
        draft: &ActorDraft,
    ) -> ApiResult<Actor>;

    /// Delete an actor. Failures are not reported.
    async fn delete_actor(&self, session: &Session, id: EntityId);

    /// Attach an actor to a movie's cast and return the updated movie.
    async fn add_movie_actor(
        &self,
        session: &Session,
        movie_id: EntityId,
        actor: &ActorRef,
    ) -> ApiResult<Movie>;

    /// Detach an actor from a movie's cast. Failures are not reported.
    async fn remove_movie_actor(&self, session: &Session, movie_id: EntityId, actor: &ActorRef);
}

/// `reqwest`-backed implementation of [`CastingApi`].
#[derive(Clone, Debug, Default)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    /// Wrap a configured HTTP client.
    #[must_use]
    pub const fn new(http: Client) -> Self {
        Self { http }
    }

    /// Issue a request and decode the JSON response.
    ///
    /// The bearer header is only sent when the session holds a token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response arrives,
    /// [`ApiError::Rejected`] for failure statuses and [`ApiError::Decode`]
    /// when a success body does not match `T`.
    pub async fn request<T, B>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = session
            .endpoint(path)
            .map_err(|source| ApiError::InvalidUrl {
                url: format!("{}{path}", session.base_url()),
                source,
            })?;

        let mut builder = self.http.request(method.clone(), url);
        if let Some(token) = session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, path, "issuing api request");
        let transport = |source| ApiError::Transport {
            method: method.clone(),
            path: path.to_string(),
            source,
        };
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            debug!(%method, path, status = status.as_u16(), "api request rejected");
            return Err(ApiError::Rejected {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body: ErrorBody::from_bytes(&bytes),
            });
        }

        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(session, Method::GET, path, None).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(session, Method::POST, path, Some(body)).await
    }

    /// `PATCH` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(session, Method::PATCH, path, Some(body)).await
    }

    /// `DELETE` a path, optionally with a JSON body.
    ///
    /// Any failure is logged and turned into `None`.
    pub async fn delete<B>(&self, session: &Session, path: &str, body: Option<&B>) -> Option<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        match self.request::<Value, B>(session, Method::DELETE, path, body).await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(path, status = ?err.status(), error = %err.detail(), "delete request failed");
                None
            }
        }
    }
}

#[async_trait]
impl CastingApi for ApiClient {
    async fn permissions(&self, session: &Session) -> ApiResult<Vec<String>> {
        let envelope: PermissionsEnvelope = self.get(session, "/user").await?;
        Ok(envelope.permissions)
    }

    async fn movies(&self, session: &Session) -> ApiResult<Vec<Movie>> {
        let envelope: MoviesEnvelope = self.get(session, "/movies").await?;
        Ok(envelope.movies)
    }

    async fn create_movie(&self, session: &Session, draft: &MovieDraft) -> ApiResult<Movie> {
        let envelope: MovieEnvelope = self.post(session, "/movies", draft).await?;
        Ok(envelope.movie)
    }

    async fn update_movie(
        &self,
        session: &Session,
        id: EntityId,
        draft: &MovieDraft,
    ) -> ApiResult<Movie> {
        let envelope: MovieEnvelope = self
            .patch(session, &format!("/movies/{id}"), draft)
            .await?;
        Ok(envelope.movie)
    }

    async fn delete_movie(&self, session: &Session, id: EntityId) {
        self.delete::<()>(session, &format!("/movies/{id}"), None).await;
    }

    async fn actors(&self, session: &Session) -> ApiResult<Vec<Actor>> {
        let envelope: ActorsEnvelope = self.get(session, "/actors").await?;
        Ok(envelope.actors)
    }

    async fn create_actor(&self, session: &Session, draft: &ActorDraft) -> ApiResult<Actor> {
        let envelope: ActorEnvelope = self.post(session, "/actors", draft).await?;
        Ok(envelope.actor)
    }

    async fn update_actor(
        &self,
        session: &Session,
        id: EntityId,
        draft: &ActorDraft,
    ) -> ApiResult<Actor> {
        let envelope: ActorEnvelope = self
            .patch(session, &format!("/actors/{id}"), draft)
            .await?;
        Ok(envelope.actor)
    }

    async fn delete_actor(&self, session: &Session, id: EntityId) {
        self.delete::<()>(session, &format!("/actors/{id}"), None).await;
    }

    async fn add_movie_actor(
        &self,
        session: &Session,
        movie_id: EntityId,
        actor: &ActorRef,
    ) -> ApiResult<Movie> {
        let request = CastingRequest {
            actor: actor.clone(),
        };
        let envelope: MovieEnvelope = self
            .post(session, &format!("/movies/{movie_id}/actors"), &request)
            .await?;
        Ok(envelope.movie)
    }

    async fn remove_movie_actor(&self, session: &Session, movie_id: EntityId, actor: &ActorRef) {
        let request = CastingRequest {
            actor: actor.clone(),
        };
        let path = format!("/movies/{movie_id}/actors");
        self.delete(session, &path, Some(&request)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castlist_api_models::Gender;
    use castlist_test_support::fixtures::{
        actor, actor_body, actor_ref, actors_body, error_body, movie, movie_body, movie_with_cast,
        movies_body, permissions_body,
    };
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    fn session_for(server: &MockServer, token: Option<&str>) -> Session {
        let base = Url::parse(&server.base_url()).expect("mock server url");
        Session::new(base, token.map(str::to_string))
    }

    #[tokio::test]
    async fn permissions_unwraps_envelope_and_sends_bearer() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/user")
                .header("authorization", "Bearer tok");
            then.status(200)
                .json_body(permissions_body(&["movies:create", "actors:delete"]));
        });

        let client = ApiClient::default();
        let permissions = client
            .permissions(&session_for(&server, Some("tok")))
            .await
            .expect("permissions");
        assert_eq!(permissions, vec!["movies:create", "actors:delete"]);
        mock.assert();
    }

    #[tokio::test]
    async fn request_without_token_omits_authorization() {
        let server = MockServer::start_async().await;
        let authed = server.mock(|when, then| {
            when.method(GET).path("/movies").header_exists("authorization");
            then.status(500);
        });
        let anonymous = server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(movies_body(&[]));
        });

        let movies = ApiClient::default()
            .movies(&session_for(&server, None))
            .await
            .expect("movies");
        assert!(movies.is_empty());
        assert_eq!(authed.hits(), 0);
        anonymous.assert();
    }

    #[tokio::test]
    async fn create_movie_posts_draft_fields() {
        let server = MockServer::start_async().await;
        let created = movie(1, "Dune", "2021-10-22");
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/movies")
                .json_body(json!({ "title": "Dune", "release_date": "2021-10-22" }));
            then.status(200).json_body(movie_body(&created));
        });

        let draft = MovieDraft::try_from(&created).expect("dated movie");
        let stored = ApiClient::default()
            .create_movie(&session_for(&server, Some("tok")), &draft)
            .await
            .expect("create");
        assert_eq!(stored, created);
        mock.assert();
    }

    #[tokio::test]
    async fn update_actor_patches_by_id() {
        let server = MockServer::start_async().await;
        let updated = actor(4, "Rebecca Ferguson", 38, Gender::Female);
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/actors/4")
                .json_body(json!({ "name": "Rebecca Ferguson", "age": 38, "gender": "F" }));
            then.status(200).json_body(actor_body(&updated));
        });

        let stored = ApiClient::default()
            .update_actor(
                &session_for(&server, Some("tok")),
                4,
                &ActorDraft::from(&updated),
            )
            .await
            .expect("update");
        assert_eq!(stored.name, "Rebecca Ferguson");
        mock.assert();
    }

    #[tokio::test]
    async fn rejected_request_carries_status_and_envelope() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/actors");
            then.status(401).json_body(error_body(401, "unauthorized"));
        });

        let err = ApiClient::default()
            .actors(&session_for(&server, Some("expired")))
            .await
            .expect_err("401 should fail");
        assert_eq!(err.status(), Some(401));
        match err {
            ApiError::Rejected { body, path, .. } => {
                assert_eq!(path, "/actors");
                assert_eq!(body.message().as_deref(), Some("unauthorized"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_rejection() {
        let session = Session::new(
            Url::parse("http://127.0.0.1:9").expect("url"),
            Some("tok".into()),
        );
        let err = ApiClient::default()
            .movies(&session)
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn mismatched_success_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(json!({ "films": [] }));
        });

        let err = ApiClient::default()
            .movies(&session_for(&server, Some("tok")))
            .await
            .expect_err("wrong envelope");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn delete_swallows_failures() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/movies/9");
            then.status(404).json_body(error_body(404, "not found"));
        });

        let client = ApiClient::default();
        client
            .delete_movie(&session_for(&server, Some("tok")), 9)
            .await;
        let raw = client
            .delete::<()>(&session_for(&server, Some("tok")), "/movies/9", None)
            .await;
        assert_eq!(raw, None);
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn delete_accepts_empty_success_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/actors/2");
            then.status(204);
        });

        let raw = ApiClient::default()
            .delete::<()>(&session_for(&server, Some("tok")), "/actors/2", None)
            .await;
        assert_eq!(raw, Some(Value::Null));
    }

    #[tokio::test]
    async fn casting_calls_send_actor_reference() {
        let server = MockServer::start_async().await;
        let lead = actor(5, "Timothée Chalamet", 25, Gender::Male);
        let cast = movie_with_cast(1, "Dune", "2021-10-22", &[&lead]);
        let attach = server.mock(|when, then| {
            when.method(POST)
                .path("/movies/1/actors")
                .json_body(json!({ "actor": { "id": 5, "name": "Timothée Chalamet" } }));
            then.status(200).json_body(movie_body(&cast));
        });
        let detach = server.mock(|when, then| {
            when.method(DELETE)
                .path("/movies/1/actors")
                .json_body(json!({ "actor": { "id": 5, "name": "Timothée Chalamet" } }));
            then.status(200).json_body(json!({ "success": true }));
        });

        let client = ApiClient::default();
        let session = session_for(&server, Some("tok"));
        let reference = actor_ref(5, "Timothée Chalamet");
        let updated = client
            .add_movie_actor(&session, 1, &reference)
            .await
            .expect("attach");
        assert!(updated.has_actor(5));
        client.remove_movie_actor(&session, 1, &reference).await;

        attach.assert();
        detach.assert();
    }

    #[tokio::test]
    async fn actors_listing_decodes_filmography() {
        let server = MockServer::start_async().await;
        let film = movie(2, "Arrival", "2016-11-11");
        let credited = castlist_test_support::fixtures::actor_in(
            3,
            "Amy Adams",
            47,
            Gender::Female,
            &[&film],
        );
        server.mock(|when, then| {
            when.method(GET).path("/actors");
            then.status(200).json_body(actors_body(&[credited.clone()]));
        });

        let actors = ApiClient::default()
            .actors(&session_for(&server, Some("tok")))
            .await
            .expect("actors");
        assert_eq!(actors, vec![credited]);
    }
}
