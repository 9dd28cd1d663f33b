//! evectl-core - Shared functionality for the evectl CLI
//!
//! The resource model, builders, and client port that the command layer
//! drives. Nothing in here talks to a terminal or a network: commands
//! resolve user input into typed values, the builders assemble resource
//! specs, and an `EventingClient` implementation submits them.

pub mod builder;
pub mod client;
pub mod delivery;
pub mod destination;
pub mod error;
pub mod mock;
pub mod resources;

pub use builder::{BrokerBuilder, TriggerBuilder};
pub use client::{EventingClient, ListFilter};
pub use delivery::{BackoffPolicy, DeliveryOptions, FlagError};
pub use destination::{resolve_sink, Destination, KReference, ReferenceLookup, ResolveError};
pub use error::ClientError;
pub use mock::{Matcher, MockEventingClient, MockRecorder};
pub use resources::{Broker, BrokerSpec, DeliverySpec, ObjectMeta, Trigger, TriggerSpec};
