use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;

use karata_core::server::{end_point::game, types::ServerState};
use karata_core::setup_logger;

#[derive(Parser)]
#[command(
    name = "karata server",
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,
)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    setup_logger();

    let state = web::Data::new(ServerState::new());
    info!(host = %args.host, port = args.port, "starting karata server");

    HttpServer::new(move || App::new().app_data(state.clone()).service(game))
        .bind((args.host.as_str(), args.port))?
        .run()
        .await
}
