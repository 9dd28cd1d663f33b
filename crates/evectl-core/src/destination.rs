//! Sink destinations and the resolver that produces them
//!
//! A destination is either a named object reference or a literal URI,
//! never both. User-facing sink flags accept a URI or a `[kind:]name`
//! shorthand; `resolve_sink` normalizes either form into a `Destination`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reference to a named object in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KReference {
    pub api_version: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

/// A normalized event sink: a named reference or an absolute URI.
///
/// Exactly one variant exists per value; downstream consumers never have
/// to re-check that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    #[serde(rename = "ref")]
    Ref(KReference),
    #[serde(rename = "uri")]
    Uri(String),
}

impl Destination {
    /// Short human-readable form used in describe output.
    pub fn display(&self) -> String {
        match self {
            Destination::Ref(r) => format!("{}:{}", r.kind, r.name),
            Destination::Uri(u) => u.clone(),
        }
    }
}

/// Errors from sink resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("lookup for {kind} '{name}' failed: {reason}")]
    Lookup {
        kind: String,
        name: String,
        reason: String,
    },
}

/// Read-only existence check for named references, implemented by the
/// backend (or skipped entirely when no lookup capability is available).
pub trait ReferenceLookup {
    fn exists(&self, kind: &str, name: &str, namespace: &str) -> Result<bool, String>;
}

/// Well-known kind shorthands and the API groups they live in.
fn kind_alias(kind: &str) -> (String, String) {
    match kind.to_ascii_lowercase().as_str() {
        "service" | "svc" | "ksvc" => ("Service".into(), "serving.knative.dev/v1".into()),
        "broker" => ("Broker".into(), "eventing.knative.dev/v1".into()),
        "channel" => ("Channel".into(), "messaging.knative.dev/v1".into()),
        _ => (kind.to_string(), "v1".into()),
    }
}

/// True for strings that carry an absolute-URI scheme prefix.
fn is_absolute_uri(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => {
            let mut chars = scheme.chars();
            chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Resolve a sink flag value into a `Destination`.
///
/// Resolution rule: a value with an absolute-URI scheme (`https://...`)
/// becomes a URI destination verbatim; every other string is treated as a
/// `[kind:]name` named reference, with the kind defaulting to `Service`.
/// When a lookup capability is supplied, the referenced object must exist.
pub fn resolve_sink(
    value: &str,
    lookup: Option<&dyn ReferenceLookup>,
    namespace: &str,
) -> Result<Destination, ResolveError> {
    if is_absolute_uri(value) {
        return Ok(Destination::Uri(value.to_string()));
    }

    let (kind, name) = match value.split_once(':') {
        Some((kind, name)) => (kind, name),
        None => ("Service", value),
    };
    let (kind, api_version) = kind_alias(kind);

    if let Some(lookup) = lookup {
        let found = lookup
            .exists(&kind, name, namespace)
            .map_err(|reason| ResolveError::Lookup {
                kind: kind.clone(),
                name: name.to_string(),
                reason,
            })?;
        if !found {
            return Err(ResolveError::NotFound {
                kind,
                name: name.to_string(),
            });
        }
    }

    Ok(Destination::Ref(KReference {
        api_version,
        kind,
        namespace: Some(namespace.to_string()),
        name: name.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup(bool);

    impl ReferenceLookup for FixedLookup {
        fn exists(&self, _kind: &str, _name: &str, _namespace: &str) -> Result<bool, String> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_uri_passthrough() {
        let dest = resolve_sink("https://example.com/events", None, "default").unwrap();
        assert_eq!(dest, Destination::Uri("https://example.com/events".into()));
    }

    #[test]
    fn test_bare_name_defaults_to_service() {
        let dest = resolve_sink("mysvc", None, "default").unwrap();
        match dest {
            Destination::Ref(r) => {
                assert_eq!(r.kind, "Service");
                assert_eq!(r.api_version, "serving.knative.dev/v1");
                assert_eq!(r.name, "mysvc");
                assert_eq!(r.namespace.as_deref(), Some("default"));
            }
            Destination::Uri(_) => panic!("expected a named reference"),
        }
    }

    #[test]
    fn test_kind_shorthand() {
        let dest = resolve_sink("broker:other", None, "default").unwrap();
        match dest {
            Destination::Ref(r) => {
                assert_eq!(r.kind, "Broker");
                assert_eq!(r.api_version, "eventing.knative.dev/v1");
                assert_eq!(r.name, "other");
            }
            Destination::Uri(_) => panic!("expected a named reference"),
        }
    }

    #[test]
    fn test_non_uri_strings_are_references() {
        // A colon alone is not a scheme separator
        let dest = resolve_sink("ksvc:mysvc", None, "default").unwrap();
        assert!(matches!(dest, Destination::Ref(_)));
    }

    #[test]
    fn test_lookup_hit() {
        let lookup = FixedLookup(true);
        let dest = resolve_sink("mysvc", Some(&lookup), "default").unwrap();
        assert!(matches!(dest, Destination::Ref(_)));
    }

    #[test]
    fn test_lookup_miss() {
        let lookup = FixedLookup(false);
        let err = resolve_sink("missing", Some(&lookup), "default").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Service"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_serialized_shape() {
        let uri = Destination::Uri("https://foo".into());
        assert_eq!(
            serde_json::to_string(&uri).unwrap(),
            r#"{"uri":"https://foo"}"#
        );

        let reference = Destination::Ref(KReference {
            api_version: "serving.knative.dev/v1".into(),
            kind: "Service".into(),
            namespace: None,
            name: "mysvc".into(),
        });
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.starts_with(r#"{"ref":"#));
        assert!(json.contains(r#""apiVersion":"serving.knative.dev/v1""#));
        assert!(!json.contains("namespace"));
    }
}
