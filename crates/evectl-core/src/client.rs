//! The client port: the capability commands use to reach the backend
//!
//! Implemented by the real backend client in production and by
//! [`crate::mock::MockEventingClient`] in tests. Methods take `&mut self`:
//! a command invocation owns its client exclusively for its duration.

use crate::error::ClientError;
use crate::resources::{Broker, Trigger};

/// Server-side filtering for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict trigger listings to one broker.
    pub broker: Option<String>,
}

/// Operations over eventing resources in a single namespace.
pub trait EventingClient {
    /// The namespace this client is bound to.
    fn namespace(&self) -> &str;

    fn create_broker(&mut self, broker: Broker) -> Result<(), ClientError>;
    fn get_broker(&mut self, name: &str) -> Result<Broker, ClientError>;
    fn update_broker(&mut self, broker: Broker) -> Result<(), ClientError>;
    fn delete_broker(&mut self, name: &str) -> Result<(), ClientError>;
    fn list_brokers(&mut self, filter: &ListFilter) -> Result<Vec<Broker>, ClientError>;

    fn create_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError>;
    fn get_trigger(&mut self, name: &str) -> Result<Trigger, ClientError>;
    fn update_trigger(&mut self, trigger: Trigger) -> Result<(), ClientError>;
    fn delete_trigger(&mut self, name: &str) -> Result<(), ClientError>;
    fn list_triggers(&mut self, filter: &ListFilter) -> Result<Vec<Trigger>, ClientError>;
}
