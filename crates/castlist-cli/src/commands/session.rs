use anyhow::anyhow;
use castlist_core::{Host, RedirectFragment, SessionStatus, SessionStorage, parse_fragment};
use tracing::{debug, info};

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{CastApp, ensure_active};
use crate::output::render_permissions;

pub(crate) async fn handle_login<H, S>(
    app: &mut CastApp<H, S>,
    args: LoginArgs,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    let Some(redirect) = args.redirect_url else {
        app.login();
        return Ok(());
    };

    match parse_fragment(&redirect) {
        Some(RedirectFragment::Denied { error, description }) => {
            let detail = description
                .map_or_else(|| error.clone(), |text| format!("{error}: {text}"));
            return Err(CliError::validation(format!("login was denied ({detail})")));
        }
        Some(RedirectFragment::Granted(grant)) => {
            debug!(
                token_type = grant.token_type.as_deref().unwrap_or("unknown"),
                expires_in = ?grant.expires_in,
                scope = ?grant.scope,
                "implicit grant received"
            );
        }
        None => {}
    }

    match app.mount(&redirect).await? {
        SessionStatus::Active => {
            info!("login complete");
            render_permissions(app.store().permissions(), format)
        }
        SessionStatus::LoggedOut => {
            app.login();
            Ok(())
        }
        SessionStatus::Expired => Err(CliError::failure(anyhow!(
            "the API did not accept the new token; the session was cleared"
        ))),
    }
}

pub(crate) fn handle_logout<H, S>(app: &mut CastApp<H, S>) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    app.logout()?;
    println!("Logged out");
    Ok(())
}

pub(crate) async fn handle_whoami<H, S>(
    app: &mut CastApp<H, S>,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    ensure_active(app).await?;
    render_permissions(app.store().permissions(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{ScriptedHost, TOKEN, app_with};
    use castlist_core::AUTH_STORAGE_KEY;
    use castlist_test_support::fixtures::{actors_body, error_body, movies_body, permissions_body};
    use httpmock::prelude::*;
    use url::Url;

    fn login_args(redirect: &str) -> LoginArgs {
        LoginArgs {
            redirect_url: Some(Url::parse(redirect).expect("valid URL")),
        }
    }

    #[tokio::test]
    async fn login_persists_fragment_token() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let user = server.mock(|when, then| {
            when.method(GET)
                .path("/user")
                .header("authorization", "Bearer fresh");
            then.status(200)
                .json_body(permissions_body(&["movies:create"]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(movies_body(&[]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/actors");
            then.status(200).json_body(actors_body(&[]));
        });

        let mut app = app_with(&server, None, ScriptedHost::default());
        handle_login(
            &mut app,
            login_args("http://app.test/#access_token=fresh&token_type=Bearer&expires_in=7200"),
            OutputFormat::Table,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;

        user.assert();
        assert_eq!(app.storage().get(AUTH_STORAGE_KEY)?.as_deref(), Some("fresh"));
        assert!(app.can("movies:create"));
        Ok(())
    }

    #[tokio::test]
    async fn login_without_redirect_prints_login_url() {
        let server = MockServer::start_async().await;
        let mut app = app_with(&server, None, ScriptedHost::default());

        let no_redirect = LoginArgs { redirect_url: None };
        let result = handle_login(&mut app, no_redirect, OutputFormat::Table).await;

        assert!(result.is_ok());
        assert_eq!(app.host().redirects(), vec![app.config().login_url.clone()]);
    }

    #[tokio::test]
    async fn denied_grant_is_a_validation_error() {
        let server = MockServer::start_async().await;
        let mut app = app_with(&server, None, ScriptedHost::default());

        let err = handle_login(
            &mut app,
            login_args("http://app.test/#error=access_denied&error_description=User%20cancelled"),
            OutputFormat::Table,
        )
        .await
        .err()
        .expect("denied");

        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("access_denied: User cancelled"));
    }

    #[tokio::test]
    async fn expired_token_is_cleared() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(401)
                .json_body(error_body(401, "Token expired."));
        });
        server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(401).json_body(error_body(401, "Token expired."));
        });
        server.mock(|when, then| {
            when.method(GET).path("/actors");
            then.status(401).json_body(error_body(401, "Token expired."));
        });

        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());
        let err = handle_whoami(&mut app, OutputFormat::Json)
            .await
            .err()
            .expect("expired");

        assert_eq!(err.exit_code(), 3);
        assert_eq!(app.storage().get(AUTH_STORAGE_KEY)?, None);
        let logout_url = app.config().logout_url.clone();
        assert_eq!(app.host().redirects(), vec![logout_url]);
        Ok(())
    }

    #[tokio::test]
    async fn whoami_requires_login() {
        let server = MockServer::start_async().await;
        let mut app = app_with(&server, None, ScriptedHost::default());

        let err = handle_whoami(&mut app, OutputFormat::Table)
            .await
            .err()
            .expect("logged out");

        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn logout_clears_storage_and_redirects() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mut app = app_with(&server, Some(TOKEN), ScriptedHost::default());

        handle_logout(&mut app).map_err(|err| anyhow!(err.display_message()))?;

        assert_eq!(app.storage().get(AUTH_STORAGE_KEY)?, None);
        assert!(!app.store().is_authenticated());
        let logout_url = app.config().logout_url.clone();
        assert_eq!(app.host().redirects(), vec![logout_url]);
        Ok(())
    }
}
