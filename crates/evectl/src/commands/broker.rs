//! Broker command handlers

use std::io::Write;

use anyhow::{Context, Result};
use evectl_core::builder::BrokerBuilder;
use evectl_core::client::{EventingClient, ListFilter};
use evectl_core::delivery::DeliveryOptions;
use evectl_core::destination::ReferenceLookup;

use crate::cli::DeliveryArgs;
use crate::commands::{dl_sink_change, SinkChange};
use crate::output::{print_broker, print_broker_list, OutputFormat};

fn apply_delivery(
    builder: BrokerBuilder,
    opts: &DeliveryOptions,
    change: SinkChange,
) -> BrokerBuilder {
    let builder = builder
        .retry(opts.retry)
        .timeout(opts.timeout.clone())
        .backoff_policy(opts.backoff_policy)
        .backoff_delay(opts.backoff_delay.clone())
        .retry_after_max(opts.retry_after_max.clone());
    match change {
        SinkChange::Keep => builder,
        SinkChange::Set(sink) => builder.dl_sink(Some(sink)),
        SinkChange::Clear => builder.clear_dl_sink(),
    }
}

pub fn create(
    client: &mut dyn EventingClient,
    lookup: Option<&dyn ReferenceLookup>,
    name: &str,
    class: Option<String>,
    delivery: &DeliveryArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let opts = delivery.options()?;
    let change = dl_sink_change(&opts, lookup, &namespace)?;

    let builder = BrokerBuilder::new(name).namespace(&namespace).class(class);
    let broker = apply_delivery(builder, &opts, change).build();

    client.create_broker(broker).with_context(|| {
        format!("cannot create broker '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Broker '{}' successfully created in namespace '{}'.",
        name, namespace
    )?;
    Ok(())
}

/// Read-modify-write: fetch the broker, overlay only the fields the user
/// passed, and submit the result.
pub fn update(
    client: &mut dyn EventingClient,
    lookup: Option<&dyn ReferenceLookup>,
    name: &str,
    class: Option<String>,
    delivery: &DeliveryArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let opts = delivery.options()?;
    let change = dl_sink_change(&opts, lookup, &namespace)?;

    let existing = client.get_broker(name).with_context(|| {
        format!("cannot update broker '{}' in namespace '{}'", name, namespace)
    })?;

    let builder = BrokerBuilder::from_existing(existing).class(class);
    let broker = apply_delivery(builder, &opts, change).build();

    client.update_broker(broker).with_context(|| {
        format!("cannot update broker '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Broker '{}' successfully updated in namespace '{}'.",
        name, namespace
    )?;
    Ok(())
}

pub fn describe(
    client: &mut dyn EventingClient,
    name: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let broker = client.get_broker(name).with_context(|| {
        format!("cannot describe broker '{}' in namespace '{}'", name, namespace)
    })?;
    print_broker(out, &broker, format)
}

pub fn delete(client: &mut dyn EventingClient, name: &str, out: &mut dyn Write) -> Result<()> {
    let namespace = client.namespace().to_string();
    client.delete_broker(name).with_context(|| {
        format!("cannot delete broker '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Broker '{}' successfully deleted in namespace '{}'.",
        name, namespace
    )?;
    Ok(())
}

pub fn list(client: &mut dyn EventingClient, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let namespace = client.namespace().to_string();
    let brokers = client
        .list_brokers(&ListFilter::default())
        .with_context(|| format!("cannot list brokers in namespace '{}'", namespace))?;
    print_broker_list(out, &brokers, format)
}
