//! Human / json / yaml rendering of resources

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use evectl_core::destination::Destination;
use evectl_core::resources::{Broker, DeliverySpec, Trigger};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

fn print_machine<T: Serialize>(out: &mut dyn Write, value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
        OutputFormat::Human => unreachable!("human output handled by the caller"),
    }
    Ok(())
}

fn print_sink(out: &mut dyn Write, indent: &str, sink: &Destination) -> Result<()> {
    match sink {
        Destination::Ref(r) => {
            writeln!(out, "{}{}       {}", indent, "Kind:".cyan(), r.kind)?;
            if let Some(namespace) = &r.namespace {
                writeln!(out, "{}{}  {}", indent, "Namespace:".cyan(), namespace)?;
            }
            writeln!(out, "{}{}       {}", indent, "Name:".cyan(), r.name)?;
        }
        Destination::Uri(uri) => {
            writeln!(out, "{}{}  {}", indent, "URI:".cyan(), uri)?;
        }
    }
    Ok(())
}

fn print_delivery(out: &mut dyn Write, delivery: &DeliverySpec) -> Result<()> {
    writeln!(out, "{}", "Delivery:".cyan())?;
    match &delivery.dead_letter_sink {
        Some(Some(sink)) => writeln!(out, "  {}  {}", "DeadLetterSink:".cyan(), sink.display())?,
        Some(None) => writeln!(out, "  {}  <none>", "DeadLetterSink:".cyan())?,
        None => {}
    }
    if let Some(retry) = delivery.retry {
        writeln!(out, "  {}           {}", "Retry:".cyan(), retry)?;
    }
    if let Some(timeout) = &delivery.timeout {
        writeln!(out, "  {}         {}", "Timeout:".cyan(), timeout)?;
    }
    if let Some(policy) = delivery.backoff_policy {
        writeln!(out, "  {}   {}", "BackoffPolicy:".cyan(), policy)?;
    }
    if let Some(delay) = &delivery.backoff_delay {
        writeln!(out, "  {}    {}", "BackoffDelay:".cyan(), delay)?;
    }
    if let Some(max) = &delivery.retry_after_max {
        writeln!(out, "  {}   {}", "RetryAfterMax:".cyan(), max)?;
    }
    Ok(())
}

pub fn print_broker(out: &mut dyn Write, broker: &Broker, format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Human {
        return print_machine(out, broker, format);
    }

    writeln!(out, "{}       {}", "Name:".cyan(), broker.metadata.name)?;
    writeln!(out, "{}  {}", "Namespace:".cyan(), broker.metadata.namespace)?;
    if let Some(class) = &broker.spec.class {
        writeln!(out, "{}      {}", "Class:".cyan(), class)?;
    }
    if let Some(delivery) = &broker.spec.delivery {
        print_delivery(out, delivery)?;
    }
    Ok(())
}

pub fn print_broker_list(out: &mut dyn Write, brokers: &[Broker], format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Human {
        return print_machine(out, &brokers, format);
    }

    if brokers.is_empty() {
        writeln!(out, "No brokers found.")?;
        return Ok(());
    }
    writeln!(out, "{:<32} {}", "NAME".bold(), "CLASS".bold())?;
    for broker in brokers {
        writeln!(
            out,
            "{:<32} {}",
            broker.metadata.name,
            broker.spec.class.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

pub fn print_trigger(out: &mut dyn Write, trigger: &Trigger, format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Human {
        return print_machine(out, trigger, format);
    }

    writeln!(out, "{}       {}", "Name:".cyan(), trigger.metadata.name)?;
    writeln!(out, "{}  {}", "Namespace:".cyan(), trigger.metadata.namespace)?;
    writeln!(out, "{}     {}", "Broker:".cyan(), trigger.spec.broker)?;
    if let Some(filter) = &trigger.spec.filter {
        writeln!(out, "{}", "Filter:".cyan())?;
        for (key, value) in filter {
            writeln!(out, "  {}:  {}", key, value)?;
        }
    }
    if let Some(sink) = &trigger.spec.subscriber {
        writeln!(out, "{}", "Sink:".cyan())?;
        print_sink(out, "  ", sink)?;
    }
    Ok(())
}

pub fn print_trigger_list(
    out: &mut dyn Write,
    triggers: &[Trigger],
    format: OutputFormat,
) -> Result<()> {
    if format != OutputFormat::Human {
        return print_machine(out, &triggers, format);
    }

    if triggers.is_empty() {
        writeln!(out, "No triggers found.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<32} {:<24} {}",
        "NAME".bold(),
        "BROKER".bold(),
        "SINK".bold()
    )?;
    for trigger in triggers {
        let sink = trigger
            .spec
            .subscriber
            .as_ref()
            .map(|s| s.display())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<32} {:<24} {}",
            trigger.metadata.name, trigger.spec.broker, sink
        )?;
    }
    Ok(())
}
