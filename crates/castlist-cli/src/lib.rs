#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

//! Administrative CLI for the Castlist movie and actor catalogue.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration resolution and dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: HTTP client wiring and the CLI error model
//! - `host.rs`: terminal prompts and the on-disk session file
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod host;
pub(crate) mod output;

pub use cli::run;
