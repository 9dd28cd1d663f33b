//! Record/replay mock client for command tests
//!
//! A test registers the calls it expects through the [`MockRecorder`],
//! runs the command under test against the [`MockEventingClient`], and
//! finishes with [`MockRecorder::validate`]. Expectations are matched
//! first-registered-first per operation and consumed exactly once.
//!
//! Failures here are test-infrastructure failures, not backend errors, so
//! they panic instead of flowing through `ClientError`: an unexpected call
//! aborts the test on the spot rather than at validation time, and the
//! message distinguishes a wrong call from an exceeded call count.
//!
//! One mock per test; exclusive `&mut` access is what guarantees the
//! consume-exactly-once invariant without any locking.

use crate::client::{EventingClient, ListFilter};
use crate::error::ClientError;
use crate::resources::{Broker, Trigger};

/// Extracts the logical key (resource name) used for expectation matching.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Broker {
    fn key(&self) -> &str {
        self.name()
    }
}

impl Keyed for Trigger {
    fn key(&self) -> &str {
        self.name()
    }
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for ListFilter {
    fn key(&self) -> &str {
        self.broker.as_deref().unwrap_or("")
    }
}

/// How an expectation decides whether an incoming call is the one it was
/// registered for.
pub enum Matcher<A> {
    /// Matches any call to the operation.
    Any,
    /// Matches on the resource name.
    Name(String),
    /// Arbitrary predicate over the call argument.
    Pred(Box<dyn Fn(&A) -> bool>),
}

impl<A: Keyed> Matcher<A> {
    fn matches(&self, arg: &A) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Name(name) => arg.key() == name,
            Matcher::Pred(pred) => pred(arg),
        }
    }

    fn describe(&self) -> String {
        match self {
            Matcher::Any => "<any>".to_string(),
            Matcher::Name(name) => format!("'{}'", name),
            Matcher::Pred(_) => "<predicate>".to_string(),
        }
    }
}

impl<A> From<&str> for Matcher<A> {
    fn from(name: &str) -> Self {
        Matcher::Name(name.to_string())
    }
}

struct Expect<A, R> {
    label: String,
    matcher: Matcher<A>,
    result: Result<R, ClientError>,
    consumed: bool,
}

fn register<A, R>(
    queue: &mut Vec<Expect<A, R>>,
    op: &str,
    matcher: Matcher<A>,
    result: Result<R, ClientError>,
) where
    A: Keyed,
{
    queue.push(Expect {
        label: format!("{}({})", op, matcher.describe()),
        matcher,
        result,
        consumed: false,
    });
}

/// Find the first unconsumed matching expectation, mark it consumed, and
/// replay its canned result. Panics on a call nothing was registered for.
fn consume<A, R>(op: &str, queue: &mut Vec<Expect<A, R>>, arg: &A) -> Result<R, ClientError>
where
    A: Keyed,
    R: Clone,
{
    for exp in queue.iter_mut() {
        if !exp.consumed && exp.matcher.matches(arg) {
            exp.consumed = true;
            return exp.result.clone();
        }
    }
    if queue.iter().any(|exp| exp.consumed && exp.matcher.matches(arg)) {
        panic!(
            "call count exceeded: {}('{}') already consumed every matching expectation",
            op,
            arg.key()
        );
    }
    panic!(
        "unexpected call: {}('{}') matches no registered expectation",
        op,
        arg.key()
    );
}

fn unmet<A, R>(queue: &[Expect<A, R>], into: &mut Vec<String>) {
    for exp in queue {
        if !exp.consumed {
            into.push(exp.label.clone());
        }
    }
}

/// Registered expectations, one queue per client-port operation.
#[derive(Default)]
pub struct MockRecorder {
    create_broker: Vec<Expect<Broker, ()>>,
    get_broker: Vec<Expect<String, Broker>>,
    update_broker: Vec<Expect<Broker, ()>>,
    delete_broker: Vec<Expect<String, ()>>,
    list_brokers: Vec<Expect<ListFilter, Vec<Broker>>>,
    create_trigger: Vec<Expect<Trigger, ()>>,
    get_trigger: Vec<Expect<String, Trigger>>,
    update_trigger: Vec<Expect<Trigger, ()>>,
    delete_trigger: Vec<Expect<String, ()>>,
    list_triggers: Vec<Expect<ListFilter, Vec<Trigger>>>,
}

impl MockRecorder {
    pub fn create_broker(
        &mut self,
        matcher: impl Into<Matcher<Broker>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.create_broker, "create_broker", matcher.into(), result);
    }

    pub fn get_broker(
        &mut self,
        matcher: impl Into<Matcher<String>>,
        result: Result<Broker, ClientError>,
    ) {
        register(&mut self.get_broker, "get_broker", matcher.into(), result);
    }

    pub fn update_broker(
        &mut self,
        matcher: impl Into<Matcher<Broker>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.update_broker, "update_broker", matcher.into(), result);
    }

    pub fn delete_broker(
        &mut self,
        matcher: impl Into<Matcher<String>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.delete_broker, "delete_broker", matcher.into(), result);
    }

    pub fn list_brokers(&mut self, result: Result<Vec<Broker>, ClientError>) {
        register(&mut self.list_brokers, "list_brokers", Matcher::Any, result);
    }

    pub fn create_trigger(
        &mut self,
        matcher: impl Into<Matcher<Trigger>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.create_trigger, "create_trigger", matcher.into(), result);
    }

    pub fn get_trigger(
        &mut self,
        matcher: impl Into<Matcher<String>>,
        result: Result<Trigger, ClientError>,
    ) {
        register(&mut self.get_trigger, "get_trigger", matcher.into(), result);
    }

    pub fn update_trigger(
        &mut self,
        matcher: impl Into<Matcher<Trigger>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.update_trigger, "update_trigger", matcher.into(), result);
    }

    pub fn delete_trigger(
        &mut self,
        matcher: impl Into<Matcher<String>>,
        result: Result<(), ClientError>,
    ) {
        register(&mut self.delete_trigger, "delete_trigger", matcher.into(), result);
    }

    pub fn list_triggers(
        &mut self,
        matcher: impl Into<Matcher<ListFilter>>,
        result: Result<Vec<Trigger>, ClientError>,
    ) {
        register(&mut self.list_triggers, "list_triggers", matcher.into(), result);
    }

    /// Teardown check: panics naming every expectation that was never
    /// exercised. Call this at the end of every test that uses the mock.
    pub fn validate(&self) {
        let mut leftover = Vec::new();
        unmet(&self.create_broker, &mut leftover);
        unmet(&self.get_broker, &mut leftover);
        unmet(&self.update_broker, &mut leftover);
        unmet(&self.delete_broker, &mut leftover);
        unmet(&self.list_brokers, &mut leftover);
        unmet(&self.create_trigger, &mut leftover);
        unmet(&self.get_trigger, &mut leftover);
        unmet(&self.update_trigger, &mut leftover);
        unmet(&self.delete_trigger, &mut leftover);
        unmet(&self.list_triggers, &mut leftover);

        if !leftover.is_empty() {
            panic!("unmet expectations:\n  {}", leftover.join("\n  "));
        }
    }
}

/// Test double for the client port, driven by a [`MockRecorder`].
pub struct MockEventingClient {
    namespace: String,
    recorder: MockRecorder,
}

impl MockEventingClient {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            recorder: MockRecorder::default(),
        }
    }

    /// The recorder used to register expectations and to validate at the
    /// end of the test.
    pub fn recorder(&mut self) -> &mut MockRecorder {
        &mut self.recorder
    }
}

impl EventingClient for MockEventingClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn create_broker(&mut self, broker: Broker) -> Result<(), ClientError> {
        consume("create_broker", &mut self.recorder.create_broker, &broker)
    }

    fn get_broker(&mut self, name: &str) -> Result<Broker, ClientError> {
        consume("get_broker", &mut self.recorder.get_broker, &name.to_string())
    }

    fn update_broker(&mut self, broker: Broker) -> Result<(), ClientError> {
        consume("update_broker", &mut self.recorder.update_broker, &broker)
    }

    fn delete_broker(&mut self, name: &str) -> Result<(), ClientError> {
        consume("delete_broker", &mut self.recorder.delete_broker, &name.to_string())
    }

    fn list_brokers(&mut self, filter: &ListFilter) -> Result<Vec<Broker>, ClientError> {
        consume("list_brokers", &mut self.recorder.list_brokers, filter)
    }

    fn create_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError> {
        consume("create_trigger", &mut self.recorder.create_trigger, &trigger)
    }

    fn get_trigger(&mut self, name: &str) -> Result<Trigger, ClientError> {
        consume("get_trigger", &mut self.recorder.get_trigger, &name.to_string())
    }

    fn update_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError> {
        consume("update_trigger", &mut self.recorder.update_trigger, &trigger)
    }

    fn delete_trigger(&mut self, name: &str) -> Result<(), ClientError> {
        consume("delete_trigger", &mut self.recorder.delete_trigger, &name.to_string())
    }

    fn list_triggers(&mut self, filter: &ListFilter) -> Result<Vec<Trigger>, ClientError> {
        consume("list_triggers", &mut self.recorder.list_triggers, filter)
    }
}
