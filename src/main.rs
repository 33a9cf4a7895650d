use std::process::exit;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use warp::Filter;

mod args;
mod auth;
mod config;
mod flash;
mod forms;
mod pages;
mod password;
mod routes;
mod store;
mod user;
mod vestibule;

use args::Args;
use config::Config;
use store::Store;
use vestibule::Vestibule;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    let addr = match args.addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("couldn't parse listen address: {e}");
            exit(1);
        }
    };

    // a .env file is optional, a broken one isn't
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            error!("couldn't read .env: {e}");
            exit(1);
        }
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            exit(1);
        }
    };

    let store = Store::new(&config.database_url).await;
    let app = Arc::new(Vestibule::new(store, &config.secret_key));

    let routes = routes::routes(app, args.secure()).with(warp::log("vestibule"));

    info!("listening on {addr}");

    warp::serve(routes).run(addr).await;
}
