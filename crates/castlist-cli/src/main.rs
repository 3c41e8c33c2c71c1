//! Binary entrypoint for the Castlist CLI.

#[tokio::main]
async fn main() {
    let exit_code = castlist_cli::run().await;
    std::process::exit(exit_code);
}
