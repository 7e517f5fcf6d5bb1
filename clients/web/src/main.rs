use std::io;

use actix_web::{
    middleware::{self, Condition},
    web::Data,
    App, HttpServer,
};
use actix_web_lab::middleware::from_fn;
use clap::Parser;
use contactdb::store::{open_store, StoreEngine, StoreOptions};

use crate::method_override::method_override;

mod error;
mod flash;
mod forms;
mod method_override;
mod routes;
mod validation;
mod views;

/// 📇 Contact App, a small address book served as plain HTML pages
#[derive(Parser, Debug)]
struct Cli {
    /// Location of the contact data. Reads / writes to this directory. Note: Does not support shell paths, e.g. ~
    #[clap(short, long, default_value = "data")]
    data: std::path::PathBuf,

    /// Storage engine: `document` (transaction log) or `file` (single contacts.json)
    #[clap(short, long, default_value = "document")]
    store: StoreEngine,

    /// Port the web server will run on
    #[clap(short, long, default_value = "3000")]
    port: u16,

    /// Address the web server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Disables the per-request access log
    #[clap(long)]
    no_log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let store_options = StoreOptions::default()
        .set_data_directory(args.data)
        .set_engine(args.store);

    let store = match open_store(&store_options) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Unable to open contact store: {}", err);

            return Err(io::Error::new(io::ErrorKind::Other, err));
        }
    };

    log::info!(
        "starting HTTP server on port {} [Store: {:?}].",
        args.port,
        store_options.engine
    );

    log::info!("Contact App: http://{}:{}/", args.address, args.port);

    let log_http = !args.no_log_http;

    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(store.clone()))
            .configure(routes::configure)
            .wrap(from_fn(method_override))
            .wrap(Condition::new(
                log_http,
                middleware::Logger::new("%t \"%r\" %s %Dms"),
            ))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}
