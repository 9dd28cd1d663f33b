//! Wire-shaped eventing resources
//!
//! These structs mirror the remote schema's JSON shape: camelCase keys and
//! optional fields that disappear entirely when unset. A present-but-empty
//! block would override server-side defaults on update, so every optional
//! field is skipped when `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::delivery::BackoffPolicy;
use crate::destination::Destination;

pub const BROKER_KIND: &str = "Broker";
pub const TRIGGER_KIND: &str = "Trigger";
pub const EVENTING_API_VERSION: &str = "eventing.knative.dev/v1";

/// Identity metadata shared by all resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// Deserialize helper: a field that is present but `null` becomes
/// `Some(None)`, while a missing field stays `None` via `#[serde(default)]`.
/// This is what keeps "explicitly cleared" distinct from "never mentioned".
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Delivery policy attached to a broker or trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySpec {
    /// Tri-state: absent (untouched), `Some(None)` (explicitly cleared,
    /// serialized as `null`), or `Some(Some(dest))`.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub dead_letter_sink: Option<Option<Destination>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_policy: Option<BackoffPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_max: Option<String>,
}

impl DeliverySpec {
    /// True when nothing was ever set, including an explicit sink clear.
    pub fn is_empty(&self) -> bool {
        self.dead_letter_sink.is_none()
            && self.retry.is_none()
            && self.timeout.is_none()
            && self.backoff_policy.is_none()
            && self.backoff_delay.is_none()
            && self.retry_after_max.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliverySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Broker {
    pub kind: String,
    pub api_version: String,
    pub metadata: ObjectMeta,
    pub spec: BrokerSpec,
}

impl Broker {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            kind: BROKER_KIND.to_string(),
            api_version: EVENTING_API_VERSION.to_string(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                creation_timestamp: None,
            },
            spec: BrokerSpec::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSpec {
    pub broker: String,
    /// Exact-match attribute filters (`type`, `source`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Destination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub kind: String,
    pub api_version: String,
    pub metadata: ObjectMeta,
    pub spec: TriggerSpec,
}

impl Trigger {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            kind: TRIGGER_KIND.to_string(),
            api_version: EVENTING_API_VERSION.to_string(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                creation_timestamp: None,
            },
            spec: TriggerSpec::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}
