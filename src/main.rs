use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use std::process;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use dnsmsg::server::Server;
use dnsmsg::settings::Settings;

// the doc comments for this struct turn into the CLI help text
#[derive(Debug, Parser)]
/// A small authoritative DNS responder.
///
/// Answers A queries over UDP from a static list of records given in
/// a configuration file, and returns a name error for everything
/// else.  It is not a resolver: there is no recursion, no caching,
/// and no upstream.
struct Args {
    /// Interface to listen on
    #[clap(short, long, default_value_t = Ipv4Addr::LOCALHOST)]
    interface: Ipv4Addr,

    /// Port to listen on
    #[clap(short, long, default_value_t = 53)]
    port: u16,

    /// Path to a configuration file
    #[clap(short, long)]
    config_file: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = match &args.config_file {
        Some(path) => match Settings::new(path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("error reading configuration file \"{path}\": {err}");
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let addr = SocketAddr::from((args.interface, args.port));
    let server = match Server::bind(addr, settings).await {
        Ok(server) => server,
        Err(err) => {
            eprintln!("error binding UDP socket on {addr}: {err}");
            process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { server.run(shutdown_rx).await });

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            let _ = shutdown_tx.send(true);
            let _ = handle.await;
        }
        Err(err) => {
            eprintln!("error waiting for ctrl-c: {err}");
            process::exit(1);
        }
    }
}
