//! `regscreen-screen`: two-source identity screening engine.
//!
//! Pure engine crate: asks a [`SearchClient`] for registry and blacklist
//! candidates, returns one reconciled record per person.
//! No HTTP or CLI dependencies.

pub mod dates;
pub mod dedupe;
pub mod error;
pub mod fingerprint;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod response;
pub mod source;

pub use error::{CollaboratorError, ScreenError};
pub use fingerprint::fingerprint;
pub use model::{PersonRecord, SearchCriteria, SearchOutcome, SearchRequest, Source};
pub use pipeline::{list_registry, search};
pub use source::{MemorySearchClient, SearchClient};
