//! Fluent builders for broker and trigger specs
//!
//! Setters take `self` by value and return the updated builder, so every
//! builder is exclusively owned by its caller and `build()` is a pure
//! transformation. Optional setters accept `Option<T>` and leave the field
//! untouched on `None`, which lets command handlers chain every setter
//! unconditionally, passing along whichever flags the user actually gave.
//!
//! Builders never validate and never fail: name arity, enum membership and
//! sink resolution all happen before a builder is constructed.

use std::collections::BTreeMap;

use crate::delivery::BackoffPolicy;
use crate::destination::Destination;
use crate::resources::{Broker, DeliverySpec, Trigger};

/// Staged construction of a [`Broker`].
#[derive(Debug, Clone)]
pub struct BrokerBuilder {
    broker: Broker,
    delivery: DeliverySpec,
}

impl BrokerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            broker: Broker::new(name, ""),
            delivery: DeliverySpec::default(),
        }
    }

    /// Seed a builder from a fetched broker for read-modify-write updates.
    /// Fields the caller never touches keep their current values.
    pub fn from_existing(mut broker: Broker) -> Self {
        let delivery = broker.spec.delivery.take().unwrap_or_default();
        Self { broker, delivery }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.broker.metadata.namespace = namespace.to_string();
        self
    }

    pub fn class(mut self, class: Option<String>) -> Self {
        if let Some(class) = class {
            self.broker.spec.class = Some(class);
        }
        self
    }

    /// Set the dead-letter sink. `None` leaves the field as it is; to
    /// remove an existing sink use [`BrokerBuilder::clear_dl_sink`].
    pub fn dl_sink(mut self, sink: Option<Destination>) -> Self {
        if let Some(sink) = sink {
            self.delivery.dead_letter_sink = Some(Some(sink));
        }
        self
    }

    /// Explicitly clear the dead-letter sink. Distinct from never setting
    /// it: the built spec carries a `null` sink so an update removes the
    /// value on the server.
    pub fn clear_dl_sink(mut self) -> Self {
        self.delivery.dead_letter_sink = Some(None);
        self
    }

    pub fn retry(mut self, retry: Option<i32>) -> Self {
        if let Some(retry) = retry {
            self.delivery.retry = Some(retry);
        }
        self
    }

    pub fn timeout(mut self, timeout: Option<String>) -> Self {
        if let Some(timeout) = timeout {
            self.delivery.timeout = Some(timeout);
        }
        self
    }

    pub fn backoff_policy(mut self, policy: Option<BackoffPolicy>) -> Self {
        if let Some(policy) = policy {
            self.delivery.backoff_policy = Some(policy);
        }
        self
    }

    pub fn backoff_delay(mut self, delay: Option<String>) -> Self {
        if let Some(delay) = delay {
            self.delivery.backoff_delay = Some(delay);
        }
        self
    }

    pub fn retry_after_max(mut self, max: Option<String>) -> Self {
        if let Some(max) = max {
            self.delivery.retry_after_max = Some(max);
        }
        self
    }

    /// Assemble the broker. The delivery block appears only when at least
    /// one delivery field was set (an explicit sink clear counts), so a
    /// spec with no delivery flags never overrides server-side defaults.
    pub fn build(mut self) -> Broker {
        if !self.delivery.is_empty() {
            self.broker.spec.delivery = Some(self.delivery);
        }
        self.broker
    }
}

/// Staged construction of a [`Trigger`].
#[derive(Debug, Clone)]
pub struct TriggerBuilder {
    trigger: Trigger,
}

impl TriggerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            trigger: Trigger::new(name, ""),
        }
    }

    /// Seed a builder from a fetched trigger for read-modify-write updates.
    pub fn from_existing(trigger: Trigger) -> Self {
        Self { trigger }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.trigger.metadata.namespace = namespace.to_string();
        self
    }

    pub fn broker(mut self, broker: &str) -> Self {
        self.trigger.spec.broker = broker.to_string();
        self
    }

    /// Replace the attribute filters. `None` keeps the current filters.
    pub fn filters(mut self, filters: Option<BTreeMap<String, String>>) -> Self {
        if let Some(filters) = filters {
            self.trigger.spec.filter = Some(filters);
        }
        self
    }

    pub fn subscriber(mut self, subscriber: Option<Destination>) -> Self {
        if let Some(subscriber) = subscriber {
            self.trigger.spec.subscriber = Some(subscriber);
        }
        self
    }

    pub fn build(self) -> Trigger {
        self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::KReference;

    fn sink(name: &str) -> Destination {
        Destination::Ref(KReference {
            api_version: "serving.knative.dev/v1".into(),
            kind: "Service".into(),
            namespace: None,
            name: name.into(),
        })
    }

    #[test]
    fn test_no_delivery_flags_means_no_delivery_block() {
        let broker = BrokerBuilder::new("mybroker")
            .namespace("default")
            .class(Some("Kafka".into()))
            .dl_sink(None)
            .retry(None)
            .timeout(None)
            .backoff_policy(None)
            .backoff_delay(None)
            .retry_after_max(None)
            .build();

        assert_eq!(broker.name(), "mybroker");
        assert_eq!(broker.spec.class.as_deref(), Some("Kafka"));
        assert!(broker.spec.delivery.is_none());
    }

    #[test]
    fn test_single_delivery_field_emits_block() {
        let broker = BrokerBuilder::new("b").namespace("default").retry(Some(0)).build();
        let delivery = broker.spec.delivery.expect("delivery block expected");
        assert_eq!(delivery.retry, Some(0));
        assert!(delivery.dead_letter_sink.is_none());
    }

    #[test]
    fn test_sink_set_clear_absent_are_distinct() {
        let set = BrokerBuilder::new("b").dl_sink(Some(sink("dlq"))).build();
        let cleared = BrokerBuilder::new("b").clear_dl_sink().build();
        let absent = BrokerBuilder::new("b").build();

        assert_eq!(
            set.spec.delivery.as_ref().unwrap().dead_letter_sink,
            Some(Some(sink("dlq")))
        );
        assert_eq!(
            cleared.spec.delivery.as_ref().unwrap().dead_letter_sink,
            Some(None)
        );
        assert!(absent.spec.delivery.is_none());

        // All three serialize differently
        let jsons: Vec<String> = [&set, &cleared, &absent]
            .iter()
            .map(|b| serde_json::to_string(b).unwrap())
            .collect();
        assert_ne!(jsons[0], jsons[1]);
        assert_ne!(jsons[1], jsons[2]);
        assert_ne!(jsons[0], jsons[2]);
    }

    #[test]
    fn test_update_preserves_untouched_fields() {
        let existing = BrokerBuilder::new("b")
            .namespace("default")
            .retry(Some(5))
            .dl_sink(Some(sink("dlq")))
            .build();

        let updated = BrokerBuilder::from_existing(existing)
            .clear_dl_sink()
            .timeout(Some("PT30S".into()))
            .build();

        let delivery = updated.spec.delivery.unwrap();
        assert_eq!(delivery.retry, Some(5));
        assert_eq!(delivery.dead_letter_sink, Some(None));
        assert_eq!(delivery.timeout.as_deref(), Some("PT30S"));
    }

    #[test]
    fn test_setters_are_idempotent() {
        let broker = BrokerBuilder::new("b")
            .retry(Some(3))
            .retry(Some(3))
            .build();
        assert_eq!(broker.spec.delivery.unwrap().retry, Some(3));
    }

    #[test]
    fn test_trigger_builder() {
        let mut filters = BTreeMap::new();
        filters.insert("type".to_string(), "foo.type.knative".to_string());

        let trigger = TriggerBuilder::new("testtrigger")
            .namespace("default")
            .broker("mybroker")
            .filters(Some(filters))
            .subscriber(Some(sink("mysvc")))
            .build();

        assert_eq!(trigger.name(), "testtrigger");
        assert_eq!(trigger.spec.broker, "mybroker");
        assert_eq!(
            trigger.spec.filter.as_ref().unwrap().get("type").unwrap(),
            "foo.type.knative"
        );
    }

    #[test]
    fn test_trigger_update_keeps_filters_when_not_replaced() {
        let mut filters = BTreeMap::new();
        filters.insert("source".to_string(), "src".to_string());
        let existing = TriggerBuilder::new("t")
            .broker("mybroker")
            .filters(Some(filters))
            .build();

        let updated = TriggerBuilder::from_existing(existing)
            .filters(None)
            .subscriber(Some(sink("other")))
            .build();

        assert!(updated.spec.filter.is_some());
        assert_eq!(updated.spec.subscriber, Some(sink("other")));
    }
}
