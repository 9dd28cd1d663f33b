//! Trigger command handlers

use std::io::Write;

use anyhow::{Context, Result};
use evectl_core::builder::TriggerBuilder;
use evectl_core::client::{EventingClient, ListFilter};
use evectl_core::destination::{resolve_sink, ReferenceLookup};

use crate::cli::parse_filters;
use crate::output::{print_trigger, print_trigger_list, OutputFormat};

pub fn create(
    client: &mut dyn EventingClient,
    lookup: Option<&dyn ReferenceLookup>,
    name: &str,
    broker: &str,
    filters: &[String],
    sink: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let filters = parse_filters(filters)?;
    let subscriber = sink
        .map(|s| resolve_sink(s, lookup, &namespace))
        .transpose()?;

    let trigger = TriggerBuilder::new(name)
        .namespace(&namespace)
        .broker(broker)
        .filters(filters)
        .subscriber(subscriber)
        .build();

    client.create_trigger(trigger).with_context(|| {
        format!("cannot create trigger '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Trigger '{}' successfully created in namespace '{}'.",
        name, namespace
    )?;
    Ok(())
}

/// Read-modify-write: filters passed on the command line replace the
/// existing set wholesale; an omitted `--sink` keeps the current one.
pub fn update(
    client: &mut dyn EventingClient,
    lookup: Option<&dyn ReferenceLookup>,
    name: &str,
    filters: &[String],
    sink: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let filters = parse_filters(filters)?;
    let subscriber = sink
        .map(|s| resolve_sink(s, lookup, &namespace))
        .transpose()?;

    let existing = client.get_trigger(name).with_context(|| {
        format!("cannot update trigger '{}' in namespace '{}'", name, namespace)
    })?;

    let trigger = TriggerBuilder::from_existing(existing)
        .filters(filters)
        .subscriber(subscriber)
        .build();

    client.update_trigger(trigger).with_context(|| {
        format!("cannot update trigger '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Trigger '{}' successfully updated in namespace '{}'.",
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
    let trigger = client.get_trigger(name).with_context(|| {
        format!("cannot describe trigger '{}' in namespace '{}'", name, namespace)
    })?;
    print_trigger(out, &trigger, format)
}

pub fn delete(client: &mut dyn EventingClient, name: &str, out: &mut dyn Write) -> Result<()> {
    let namespace = client.namespace().to_string();
    client.delete_trigger(name).with_context(|| {
        format!("cannot delete trigger '{}' in namespace '{}'", name, namespace)
    })?;
    writeln!(
        out,
        "Trigger '{}' successfully deleted in namespace '{}'.",
        name, namespace
    )?;
    Ok(())
}

pub fn list(
    client: &mut dyn EventingClient,
    broker: Option<&str>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = client.namespace().to_string();
    let filter = ListFilter {
        broker: broker.map(String::from),
    };
    let triggers = client
        .list_triggers(&filter)
        .with_context(|| format!("cannot list triggers in namespace '{}'", namespace))?;
    print_trigger_list(out, &triggers, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evectl_core::destination::{Destination, KReference};
    use evectl_core::error::ClientError;
    use evectl_core::mock::{Matcher, MockEventingClient};
    use evectl_core::resources::Trigger;
    use std::collections::BTreeMap;

    fn sample_trigger() -> Trigger {
        let mut filters = BTreeMap::new();
        filters.insert("type".into(), "foo.type.knative".into());
        filters.insert("source".into(), "src.eventing.knative".into());
        TriggerBuilder::new("testtrigger")
            .namespace("default")
            .broker("mybroker")
            .filters(Some(filters))
            .subscriber(Some(Destination::Ref(KReference {
                api_version: "serving.knative.dev/v1".into(),
                kind: "Service".into(),
                namespace: Some("myservicenamespace".into()),
                name: "mysvc".into(),
            })))
            .build()
    }

    #[test]
    fn test_describe_default_output() {
        let mut client = MockEventingClient::new("mynamespace");
        client.recorder().get_trigger("testtrigger", Ok(sample_trigger()));

        let mut out = Vec::new();
        describe(&mut client, "testtrigger", OutputFormat::Human, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        for expected in ["testtrigger", "mybroker", "foo.type.knative", "mysvc"] {
            assert!(out.contains(expected), "missing '{}' in:\n{}", expected, out);
        }

        client.recorder().validate();
    }

    #[test]
    fn test_describe_json_round_trips() {
        let mut client = MockEventingClient::new("mynamespace");
        let trigger = sample_trigger();
        client.recorder().get_trigger("testtrigger", Ok(trigger.clone()));

        let mut out = Vec::new();
        describe(&mut client, "testtrigger", OutputFormat::Json, &mut out).unwrap();
        let parsed: Trigger = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, trigger);

        client.recorder().validate();
    }

    #[test]
    fn test_describe_wraps_not_found() {
        let mut client = MockEventingClient::new("mynamespace");
        client.recorder().get_trigger(
            "testtrigger",
            Err(ClientError::not_found("Trigger", "testtrigger")),
        );

        let mut out = Vec::new();
        let err = describe(&mut client, "testtrigger", OutputFormat::Human, &mut out).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("testtrigger"));
        assert!(chain.contains("not found"));

        client.recorder().validate();
    }

    #[test]
    fn test_create_with_filters_and_sink() {
        let mut client = MockEventingClient::new("default");
        client.recorder().create_trigger(
            Matcher::Pred(Box::new(|t: &Trigger| {
                t.name() == "mytrigger"
                    && t.spec.broker == "mybroker"
                    && t.spec
                        .filter
                        .as_ref()
                        .map(|f| f.get("type").map(String::as_str) == Some("my.event"))
                        .unwrap_or(false)
                    && matches!(&t.spec.subscriber, Some(Destination::Ref(r)) if r.name == "mysvc")
            })),
            Ok(()),
        );

        let mut out = Vec::new();
        create(
            &mut client,
            None,
            "mytrigger",
            "mybroker",
            &["type=my.event".to_string()],
            Some("mysvc"),
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Trigger 'mytrigger' successfully created in namespace 'default'."));

        client.recorder().validate();
    }

    #[test]
    fn test_create_rejects_malformed_filter_before_any_call() {
        let mut client = MockEventingClient::new("default");
        let mut out = Vec::new();
        let err = create(
            &mut client,
            None,
            "mytrigger",
            "mybroker",
            &["nodelimiter".to_string()],
            None,
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("nodelimiter"));

        client.recorder().validate();
    }

    #[test]
    fn test_update_replaces_filters_keeps_sink() {
        let mut client = MockEventingClient::new("default");
        client.recorder().get_trigger("testtrigger", Ok(sample_trigger()));
        client.recorder().update_trigger(
            Matcher::Pred(Box::new(|t: &Trigger| {
                let filters = t.spec.filter.as_ref().unwrap();
                filters.len() == 1
                    && filters.get("type").map(String::as_str) == Some("other.event")
                    && t.spec.subscriber.is_some()
            })),
            Ok(()),
        );

        let mut out = Vec::new();
        update(
            &mut client,
            None,
            "testtrigger",
            &["type=other.event".to_string()],
            None,
            &mut out,
        )
        .unwrap();

        client.recorder().validate();
    }

    #[test]
    fn test_list_passes_broker_filter() {
        let mut client = MockEventingClient::new("default");
        client
            .recorder()
            .list_triggers(Matcher::Name("mybroker".into()), Ok(vec![sample_trigger()]));

        let mut out = Vec::new();
        list(&mut client, Some("mybroker"), OutputFormat::Human, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("testtrigger"));

        client.recorder().validate();
    }
}
