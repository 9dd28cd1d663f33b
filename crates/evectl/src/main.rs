//! evectl - CLI client for declarative eventing resources
//!
//! Translates user intents ("create a broker", "describe a trigger") into
//! resource specs submitted through the client port. Command handlers only
//! see the `EventingClient` trait; the binary wires in the file-backed
//! local client.

mod cli;
mod commands;
mod output;
mod store;

use std::env;
use std::io;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use store::FileStoreClient;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let namespace = cli
        .namespace
        .clone()
        .or_else(|| env::var("EVECTL_NAMESPACE").ok())
        .unwrap_or_else(|| "default".to_string());

    let mut client = FileStoreClient::open(&namespace)?;
    let lookup = client.lookup();
    let mut out = io::stdout();
    commands::run(&mut client, Some(&lookup), cli.command, &mut out)
}
