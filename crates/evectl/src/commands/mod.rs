//! Command handlers: resolve inputs, build the resource, call the client

pub mod broker;
pub mod trigger;

use std::io::Write;

use anyhow::Result;
use evectl_core::client::EventingClient;
use evectl_core::delivery::DeliveryOptions;
use evectl_core::destination::{resolve_sink, Destination, ReferenceLookup, ResolveError};

use crate::cli::{BrokerCommands, Commands, TriggerCommands};

/// What the user asked to do with the dead-letter sink.
pub(crate) enum SinkChange {
    /// Flag not passed: leave the field alone.
    Keep,
    Set(Destination),
    /// `--dl-sink ''`: remove the sink on the server.
    Clear,
}

pub(crate) fn dl_sink_change(
    opts: &DeliveryOptions,
    lookup: Option<&dyn ReferenceLookup>,
    namespace: &str,
) -> Result<SinkChange, ResolveError> {
    match opts.dead_letter_sink.as_deref() {
        None => Ok(SinkChange::Keep),
        Some("") => Ok(SinkChange::Clear),
        Some(value) => Ok(SinkChange::Set(resolve_sink(value, lookup, namespace)?)),
    }
}

/// Dispatch a parsed command against the given client.
pub fn run(
    client: &mut dyn EventingClient,
    lookup: Option<&dyn ReferenceLookup>,
    command: Commands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Broker(cmd) => match cmd {
            BrokerCommands::Create {
                name,
                class,
                delivery,
            } => broker::create(client, lookup, &name, class, &delivery, out),
            BrokerCommands::Update {
                name,
                class,
                delivery,
            } => broker::update(client, lookup, &name, class, &delivery, out),
            BrokerCommands::Describe { name, output } => {
                broker::describe(client, &name, output, out)
            }
            BrokerCommands::Delete { name } => broker::delete(client, &name, out),
            BrokerCommands::List { output } => broker::list(client, output, out),
        },
        Commands::Trigger(cmd) => match cmd {
            TriggerCommands::Create {
                name,
                broker,
                filters,
                sink,
            } => trigger::create(client, lookup, &name, &broker, &filters, sink.as_deref(), out),
            TriggerCommands::Update {
                name,
                filters,
                sink,
            } => trigger::update(client, lookup, &name, &filters, sink.as_deref(), out),
            TriggerCommands::Describe { name, output } => {
                trigger::describe(client, &name, output, out)
            }
            TriggerCommands::Delete { name } => trigger::delete(client, &name, out),
            TriggerCommands::List { broker, output } => {
                trigger::list(client, broker.as_deref(), output, out)
            }
        },
    }
}
