use castlist_api_models::ActorDraft;
use castlist_core::permissions::{ACTORS_CREATE, ACTORS_DELETE, ACTORS_UPDATE};
use castlist_core::{DeleteOutcome, Host, Modal, SessionStorage};

use crate::cli::{ActorAddArgs, ActorEditArgs, IdArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{CastApp, ensure_active, require, show_modal};
use crate::output::{render_actor, render_actors};

pub(crate) async fn handle_actor_list<H, S>(
    app: &mut CastApp<H, S>,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    render_actors(app.store().actors(), format)
}

pub(crate) async fn handle_actor_show<H, S>(
    app: &mut CastApp<H, S>,
    args: IdArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    if app.store().actor(args.id).is_none() {
        return Err(CliError::validation(format!("actor {} not found", args.id)));
    }
    app.modal_on(Modal::ViewActor { actor_id: args.id });
    show_modal(app, format)
}

pub(crate) async fn handle_actor_add<H, S>(
    app: &mut CastApp<H, S>,
    args: ActorAddArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, ACTORS_CREATE)?;

    app.modal_on(Modal::AddActor);
    let actor = app
        .add_actor(ActorDraft {
            name: args.name,
            age: args.age,
            gender: args.gender,
        })
        .await?;
    render_actor(&actor, format)
}

pub(crate) async fn handle_actor_edit<H, S>(
    app: &mut CastApp<H, S>,
    args: ActorEditArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, ACTORS_UPDATE)?;

    let mut draft = app
        .store()
        .actor(args.id)
        .map(ActorDraft::from)
        .ok_or_else(|| CliError::validation(format!("actor {} not found", args.id)))?;
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(age) = args.age {
        draft.age = age;
    }
    if let Some(gender) = args.gender {
        draft.gender = gender;
    }

    app.modal_on(Modal::EditActor { actor_id: args.id });
    app.save_actor(args.id, draft).await?;
    show_modal(app, format)
}

pub(crate) async fn handle_actor_remove<H, S>(
    app: &mut CastApp<H, S>,
    args: IdArgs,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    require(app, ACTORS_DELETE)?;

    match app.delete_actor(args.id).await? {
        DeleteOutcome::Deleted => println!("Deleted actor {}", args.id),
        DeleteOutcome::Declined => println!("Delete cancelled"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{ScriptedHost, TOKEN, app_with};
    use castlist_api_models::{Actor, Gender};
    use castlist_test_support::fixtures::{
        ALL_PERMISSIONS, actor, actor_body, actors_body, movies_body, permissions_body,
    };
    use httpmock::prelude::*;
    use httpmock::{Mock, MockServer};
    use serde_json::json;

    fn mock_session<'a>(
        server: &'a MockServer,
        permissions: &[&str],
        actors: &[Actor],
    ) -> Mock<'a> {
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200).json_body(permissions_body(permissions));
        });
        server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(movies_body(&[]));
        });
        let listing = actors_body(actors);
        server.mock(move |when, then| {
            when.method(GET).path("/actors");
            then.status(200).json_body(listing);
        })
    }

    #[tokio::test]
    async fn add_rejects_out_of_range_age_before_posting() {
        let server = MockServer::start_async().await;
        mock_session(&server, &ALL_PERMISSIONS, &[]);
        let create = server.mock(|when, then| {
            when.method(POST).path("/actors");
            then.status(200);
        });
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        let err = handle_actor_add(
            &mut app,
            ActorAddArgs {
                name: "Methuselah".into(),
                age: 200,
                gender: Gender::Male,
            },
            OutputFormat::Table,
        )
        .await
        .err()
        .expect("age out of range");

        assert_eq!(err.exit_code(), 2);
        create.assert_hits(0);
        assert_eq!(app.state().modal, None);
    }

    #[tokio::test]
    async fn add_posts_gender_code() {
        let server = MockServer::start_async().await;
        let listing = mock_session(&server, &ALL_PERMISSIONS, &[]);
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/actors")
                .json_body(json!({ "name": "Jodie Comer", "age": 31, "gender": "F" }));
            then.status(200)
                .json_body(actor_body(&actor(4, "Jodie Comer", 31, Gender::Female)));
        });
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        let result = handle_actor_add(
            &mut app,
            ActorAddArgs {
                name: "Jodie Comer".into(),
                age: 31,
                gender: Gender::Female,
            },
            OutputFormat::Table,
        )
        .await;

        assert!(result.is_ok());
        create.assert();
        listing.assert_hits(2);
    }

    #[tokio::test]
    async fn edit_keeps_unchanged_fields() {
        let server = MockServer::start_async().await;
        let stored = actor(4, "Jodie Comer", 31, Gender::Female);
        mock_session(&server, &ALL_PERMISSIONS, &[stored.clone()]);
        let update = server.mock(|when, then| {
            when.method(PATCH)
                .path("/actors/4")
                .json_body(json!({ "name": "Jodie Comer", "age": 32, "gender": "F" }));
            then.status(200).json_body(actor_body(&stored));
        });
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        let result = handle_actor_edit(
            &mut app,
            ActorEditArgs {
                id: 4,
                name: None,
                age: Some(32),
                gender: None,
            },
            OutputFormat::Json,
        )
        .await;

        assert!(result.is_ok());
        update.assert();
        assert_eq!(app.state().modal, Some(Modal::ViewActor { actor_id: 4 }));
    }

    #[tokio::test]
    async fn unspecified_gender_must_be_chosen_on_edit() {
        let server = MockServer::start_async().await;
        let undecided = actor(6, "Nobody", 40, Gender::Unspecified);
        mock_session(&server, &ALL_PERMISSIONS, &[undecided]);
        let update = server.mock(|when, then| {
            when.method(PATCH).path("/actors/6");
            then.status(200);
        });
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        let err = handle_actor_edit(
            &mut app,
            ActorEditArgs {
                id: 6,
                name: None,
                age: Some(41),
                gender: None,
            },
            OutputFormat::Table,
        )
        .await
        .err()
        .expect("gender required");

        assert_eq!(err.exit_code(), 2);
        update.assert_hits(0);
    }

    #[tokio::test]
    async fn rejected_update_surfaces_server_message() {
        let server = MockServer::start_async().await;
        let comer = actor(4, "Jodie Comer", 31, Gender::Female);
        mock_session(&server, &ALL_PERMISSIONS, &[comer]);
        server.mock(|when, then| {
            when.method(PATCH).path("/actors/4");
            then.status(422)
                .json_body(json!({ "success": false, "error": 422, "message": "Unprocessable" }));
        });
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        let err = handle_actor_edit(
            &mut app,
            ActorEditArgs {
                id: 4,
                name: Some("J. Comer".into()),
                age: None,
                gender: None,
            },
            OutputFormat::Table,
        )
        .await
        .err()
        .expect("rejected");

        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("Unprocessable"));
    }

    #[tokio::test]
    async fn remove_requires_delete_permission() {
        let server = MockServer::start_async().await;
        let comer = actor(4, "Jodie Comer", 31, Gender::Female);
        mock_session(&server, &["actors:update"], &[comer]);
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::answering(true));

        let err = handle_actor_remove(&mut app, IdArgs { id: 4 })
            .await
            .err()
            .expect("missing permission");

        assert!(err.display_message().contains("actors:delete"));
        assert!(app.host().prompts().is_empty());
    }

    #[tokio::test]
    async fn list_and_show_render() {
        let server = MockServer::start_async().await;
        mock_session(&server, &[], &[actor(4, "Jodie Comer", 31, Gender::Female)]);
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        assert!(handle_actor_list(&mut app, OutputFormat::Table).await.is_ok());
        assert!(
            handle_actor_show(&mut app, IdArgs { id: 4 }, OutputFormat::Json)
                .await
                .is_ok()
        );
        assert_eq!(app.state().modal, Some(Modal::ViewActor { actor_id: 4 }));
    }
}
