//! Argument parsing, configuration resolution and command dispatch.

use std::path::PathBuf;

use anyhow::anyhow;
use castlist_api_models::{EntityId, Gender};
use castlist_core::{
    ApiClient, App, AppConfig, AUTH_STORAGE_KEY, Host, IdentityProvider, SessionStorage,
};
use castlist_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LogSettings, init_logging};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::client::{CliError, CliResult, HttpContext, parse_url};
use crate::commands::{CastApp, actors, cast, movies, session};
use crate::host::{FileSessionStore, TerminalHost};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_APP_URL: &str = "http://localhost:8000/";
const DEFAULT_SESSION_FILE: &str = ".castlist-session.json";

/// Parses CLI arguments, executes the requested command and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let deps = match HttpContext::new(cli.timeout, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, &deps).await {
        Ok(()) => {
            debug!(command = command_name, %trace_id, "command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            eprintln!("error: {}", err.display_message());
            debug!(command = command_name, %trace_id, exit_code, "command failed");
            exit_code
        }
    }
}

fn init_telemetry(cli: &Cli) {
    let config = LogSettings {
        filter: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build: option_env!("CASTLIST_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
}

async fn dispatch(cli: Cli, deps: &HttpContext) -> CliResult<()> {
    let config = resolve_config(&cli)?;
    let storage = FileSessionStore::new(&cli.session_file);
    let token = storage
        .get(AUTH_STORAGE_KEY)
        .map_err(|err| CliError::failure(anyhow!(err.detail())))?;
    debug!(session_file = %storage.path().display(), has_token = token.is_some(), "session loaded");

    let mut app = App::new(
        config,
        ApiClient::new(deps.client.clone()),
        TerminalHost,
        storage,
    )
    .with_token(token);

    execute(&mut app, cli.command, cli.output).await
}

/// Run one command against a prepared container.
pub(crate) async fn execute<H, S>(
    app: &mut CastApp<H, S>,
    command: Command,
    format: OutputFormat,
) -> CliResult<()>
where
    H: Host,
    S: SessionStorage,
{
    match command {
        Command::Login(args) => session::handle_login(app, args, format).await,
        Command::Logout => session::handle_logout(app),
        Command::Whoami => session::handle_whoami(app, format).await,
        Command::Movies(movie) => match movie {
            MovieCommand::Ls => movies::handle_movie_list(app, format).await,
            MovieCommand::Show(args) => movies::handle_movie_show(app, args, format).await,
            MovieCommand::Add(args) => movies::handle_movie_add(app, args, format).await,
            MovieCommand::Edit(args) => movies::handle_movie_edit(app, args, format).await,
            MovieCommand::Rm(args) => movies::handle_movie_remove(app, args).await,
        },
        Command::Actors(actor) => match actor {
            ActorCommand::Ls => actors::handle_actor_list(app, format).await,
            ActorCommand::Show(args) => actors::handle_actor_show(app, args, format).await,
            ActorCommand::Add(args) => actors::handle_actor_add(app, args, format).await,
            ActorCommand::Edit(args) => actors::handle_actor_edit(app, args, format).await,
            ActorCommand::Rm(args) => actors::handle_actor_remove(app, args).await,
        },
        Command::Cast(casting) => match casting {
            CastCommand::Add(args) => cast::handle_cast_add(app, args, format).await,
            CastCommand::Rm(args) => cast::handle_cast_remove(app, args, format).await,
            CastCommand::Candidates(args) => cast::handle_cast_candidates(app, args, format).await,
        },
    }
}

/// Build the container configuration from explicit URLs or identity provider flags.
pub(crate) fn resolve_config(cli: &Cli) -> CliResult<AppConfig> {
    let provider = match (&cli.auth_domain, &cli.auth_audience, &cli.auth_client_id) {
        (Some(domain), Some(audience), Some(client_id)) => Some(IdentityProvider {
            domain: domain.trim().to_string(),
            audience: audience.trim().to_string(),
            client_id: client_id.trim().to_string(),
        }),
        (None, None, None) => None,
        _ => {
            return Err(CliError::validation(
                "--auth-domain, --auth-audience and --auth-client-id must be given together",
            ));
        }
    };

    let api_url = cli.api_url.clone();
    let app_url = cli.app_url.clone();
    let Some(provider) = provider else {
        return Ok(AppConfig {
            api_url,
            app_url,
            login_url: cli.login_url.clone().ok_or_else(|| missing_url("--login-url"))?,
            logout_url: cli.logout_url.clone().ok_or_else(|| missing_url("--logout-url"))?,
        });
    };

    let mut config = AppConfig::with_provider(api_url, app_url, &provider)
        .map_err(|err| CliError::validation(format!("invalid --auth-domain: {err}")))?;
    if let Some(url) = &cli.login_url {
        config.login_url = url.clone();
    }
    if let Some(url) = &cli.logout_url {
        config.logout_url = url.clone();
    }
    Ok(config)
}

fn missing_url(flag: &str) -> CliError {
    CliError::validation(format!(
        "{flag} is required unless the --auth-* flags are provided"
    ))
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Movies(MovieCommand::Ls) => "movies_ls",
        Command::Movies(MovieCommand::Show(_)) => "movies_show",
        Command::Movies(MovieCommand::Add(_)) => "movies_add",
        Command::Movies(MovieCommand::Edit(_)) => "movies_edit",
        Command::Movies(MovieCommand::Rm(_)) => "movies_rm",
        Command::Actors(ActorCommand::Ls) => "actors_ls",
        Command::Actors(ActorCommand::Show(_)) => "actors_show",
        Command::Actors(ActorCommand::Add(_)) => "actors_add",
        Command::Actors(ActorCommand::Edit(_)) => "actors_edit",
        Command::Actors(ActorCommand::Rm(_)) => "actors_rm",
        Command::Cast(CastCommand::Add(_)) => "cast_add",
        Command::Cast(CastCommand::Rm(_)) => "cast_rm",
        Command::Cast(CastCommand::Candidates(_)) => "cast_candidates",
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{input}' (expected YYYY-MM-DD): {err}"))
}

fn parse_gender(input: &str) -> Result<Gender, String> {
    input
        .parse::<Gender>()
        .map_err(|err| format!("{err} '{}' (expected M, F or X)", err.value))
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse::<LogFormat>()
        .map_err(|_| format!("unknown log format '{input}' (expected pretty or json)"))
}

#[derive(Parser)]
#[command(
    name = "castlist",
    about = "Administrative CLI for the Castlist movie and actor catalogue"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "CASTLIST_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "CASTLIST_APP_URL",
        value_parser = parse_url,
        default_value = DEFAULT_APP_URL,
        help = "Application URL the identity provider redirects back to"
    )]
    pub(crate) app_url: Url,
    #[arg(long, global = true, env = "CASTLIST_LOGIN_URL", value_parser = parse_url)]
    pub(crate) login_url: Option<Url>,
    #[arg(long, global = true, env = "CASTLIST_LOGOUT_URL", value_parser = parse_url)]
    pub(crate) logout_url: Option<Url>,
    #[arg(long, global = true, env = "CASTLIST_AUTH_DOMAIN")]
    pub(crate) auth_domain: Option<String>,
    #[arg(long, global = true, env = "CASTLIST_AUTH_AUDIENCE")]
    pub(crate) auth_audience: Option<String>,
    #[arg(long, global = true, env = "CASTLIST_AUTH_CLIENT_ID")]
    pub(crate) auth_client_id: Option<String>,
    #[arg(
        long,
        global = true,
        env = "CASTLIST_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long,
        global = true,
        env = "CASTLIST_SESSION_FILE",
        default_value = DEFAULT_SESSION_FILE,
        help = "JSON file holding the stored access token"
    )]
    pub(crate) session_file: PathBuf,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "CASTLIST_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "CASTLIST_LOG_FORMAT", value_parser = parse_log_format)]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Capture a token from a redirect URL, or print the login URL.
    Login(LoginArgs),
    /// Forget the stored token and print the logout URL.
    Logout,
    /// Show the permissions granted to the stored token.
    Whoami,
    #[command(subcommand)]
    Movies(MovieCommand),
    #[command(subcommand)]
    Actors(ActorCommand),
    #[command(subcommand)]
    Cast(CastCommand),
}

#[derive(Subcommand)]
pub(crate) enum MovieCommand {
    Ls,
    Show(IdArgs),
    Add(MovieAddArgs),
    Edit(MovieEditArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum ActorCommand {
    Ls,
    Show(IdArgs),
    Add(ActorAddArgs),
    Edit(ActorEditArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum CastCommand {
    Add(CastArgs),
    Rm(CastArgs),
    Candidates(CandidatesArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(
        long,
        value_parser = parse_url,
        help = "URL the identity provider redirected to, including its #fragment"
    )]
    pub(crate) redirect_url: Option<Url>,
}

#[derive(Args)]
pub(crate) struct IdArgs {
    pub(crate) id: EntityId,
}

#[derive(Args)]
pub(crate) struct MovieAddArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, value_parser = parse_date, help = "Release date as YYYY-MM-DD")]
    pub(crate) release_date: NaiveDate,
}

#[derive(Args)]
pub(crate) struct MovieEditArgs {
    pub(crate) id: EntityId,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) release_date: Option<NaiveDate>,
}

#[derive(Args)]
pub(crate) struct ActorAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) age: u8,
    #[arg(long, value_parser = parse_gender, help = "M, F or X")]
    pub(crate) gender: Gender,
}

#[derive(Args)]
pub(crate) struct ActorEditArgs {
    pub(crate) id: EntityId,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) age: Option<u8>,
    #[arg(long, value_parser = parse_gender)]
    pub(crate) gender: Option<Gender>,
}

#[derive(Args)]
pub(crate) struct CastArgs {
    #[arg(help = "Movie identifier")]
    pub(crate) movie: EntityId,
    #[arg(help = "Actor identifier")]
    pub(crate) actor: EntityId,
}

#[derive(Args)]
pub(crate) struct CandidatesArgs {
    #[arg(help = "Movie identifier")]
    pub(crate) movie: EntityId,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
