// Domain Layer - Entities and value types of the relational model

pub mod datetime;
pub mod digest;
pub mod group;
pub mod lookup;
pub mod project;
pub mod template;
pub mod transport;

// Re-exports
pub use datetime::Datetime;
pub use digest::ContentDigest;
pub use group::{Group, NewGroup};
pub use lookup::Lookup;
pub use project::{NewProject, Project};
pub use template::{NewTemplate, StoredVersion, Template, TemplateProbe};
pub use transport::{NewTransport, Transport, TransportCredentials};
