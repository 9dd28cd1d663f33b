//! CLI command definitions and flag handling

use std::collections::BTreeMap;

use clap::{Args, Parser, Subcommand};
use evectl_core::delivery::{DeliveryOptions, FlagError};

use crate::output::OutputFormat;

/// evectl - manage eventing brokers and triggers
#[derive(Parser)]
#[command(name = "evectl")]
#[command(version)]
#[command(about = "Manage declarative eventing resources (brokers, triggers)")]
#[command(after_help = "\
EXAMPLES:
    evectl broker create mybroker                        Create a broker
    evectl broker create mybroker -n myproject --class Kafka
    evectl broker update mybroker --dl-sink ''           Clear the dead-letter sink
    evectl broker describe mybroker -o yaml
    evectl trigger create mytrigger --broker mybroker --filter type=my.event --sink mysvc
    evectl trigger list --broker mybroker

SINKS:
    A sink is either an absolute URI (https://example.com/events) or a
    '[kind:]name' reference. The kind defaults to Service; 'broker:' and
    'channel:' shorthands are recognized.

DELIVERY FLAGS (broker create/update):
    --dl-sink        Dead-letter sink; pass '' on update to remove it
    --retry          Minimum number of delivery retries (0 is valid)
    --timeout        Per-delivery timeout, e.g. PT30S
    --backoff-policy 'linear' or 'exponential'
    --backoff-delay  Initial backoff delay, e.g. PT0.2S
    --retry-after-max  Upper bound honored for Retry-After headers")]
pub struct Cli {
    /// Namespace to operate in (default: $EVECTL_NAMESPACE or 'default')
    #[arg(short = 'n', long, global = true)]
    pub namespace: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage brokers
    #[command(subcommand)]
    Broker(BrokerCommands),

    /// Manage triggers
    #[command(subcommand)]
    Trigger(TriggerCommands),
}

#[derive(Subcommand)]
pub enum BrokerCommands {
    /// Create a broker
    Create {
        /// Broker name
        name: String,

        /// Broker class, e.g. 'MTChannelBasedBroker' or 'Kafka'
        #[arg(long)]
        class: Option<String>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },

    /// Update a broker's class or delivery options
    Update {
        /// Broker name
        name: String,

        /// Broker class
        #[arg(long)]
        class: Option<String>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },

    /// Show details of a broker
    Describe {
        /// Broker name
        name: String,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,
    },

    /// Delete a broker
    Delete {
        /// Broker name
        name: String,
    },

    /// List brokers
    List {
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum TriggerCommands {
    /// Create a trigger
    Create {
        /// Trigger name
        name: String,

        /// Broker the trigger subscribes to
        #[arg(long, default_value = "default")]
        broker: String,

        /// Exact-match attribute filter, KEY=VALUE (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Subscriber sink ('[kind:]name' or URI)
        #[arg(long)]
        sink: Option<String>,
    },

    /// Update a trigger's filters or sink
    Update {
        /// Trigger name
        name: String,

        /// Replacement attribute filters, KEY=VALUE (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Subscriber sink ('[kind:]name' or URI)
        #[arg(long)]
        sink: Option<String>,
    },

    /// Show details of a trigger
    Describe {
        /// Trigger name
        name: String,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,
    },

    /// Delete a trigger
    Delete {
        /// Trigger name
        name: String,
    },

    /// List triggers
    List {
        /// Only triggers subscribed to this broker
        #[arg(long)]
        broker: Option<String>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,
    },
}

/// Delivery-policy flags shared by broker create and update.
#[derive(Args, Debug, Default, Clone)]
pub struct DeliveryArgs {
    /// Dead-letter sink ('[kind:]name' or URI); '' removes it on update
    #[arg(long = "dl-sink")]
    pub dl_sink: Option<String>,

    /// Minimum number of delivery retries
    #[arg(long)]
    pub retry: Option<i32>,

    /// Per-delivery timeout, e.g. PT30S
    #[arg(long)]
    pub timeout: Option<String>,

    /// Retry backoff policy: 'linear' or 'exponential'
    #[arg(long)]
    pub backoff_policy: Option<String>,

    /// Initial backoff delay, e.g. PT0.2S
    #[arg(long)]
    pub backoff_delay: Option<String>,

    /// Upper bound honored for Retry-After headers, e.g. PT10S
    #[arg(long)]
    pub retry_after_max: Option<String>,
}

impl DeliveryArgs {
    /// Validate and convert the raw flags. This is where the backoff-policy
    /// literal is checked, so builders downstream can assume validity.
    pub fn options(&self) -> Result<DeliveryOptions, FlagError> {
        let backoff_policy = self
            .backoff_policy
            .as_deref()
            .map(str::parse)
            .transpose()?;

        Ok(DeliveryOptions {
            dead_letter_sink: self.dl_sink.clone(),
            retry: self.retry,
            timeout: self.timeout.clone(),
            backoff_policy,
            backoff_delay: self.backoff_delay.clone(),
            retry_after_max: self.retry_after_max.clone(),
        })
    }
}

/// Parse repeated `--filter KEY=VALUE` flags. An empty list means "no
/// filter change"; a flag without '=' is rejected before any client call.
pub fn parse_filters(raw: &[String]) -> Result<Option<BTreeMap<String, String>>, FlagError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut filters = BTreeMap::new();
    for entry in raw {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                filters.insert(key.to_string(), value.to_string());
            }
            _ => return Err(FlagError::InvalidFilter(entry.clone())),
        }
    }
    Ok(Some(filters))
}
