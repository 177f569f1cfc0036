//! Store interfaces consumed by the services.
//!
//! Implementations live in `crate::adapters`.

pub mod credentials;
pub mod matches;
pub mod profiles;
pub mod safety;
pub mod users;

pub use credentials::{CredentialStore, PasswordCredential};
pub use matches::{Match, MatchStore};
pub use profiles::{NewProfile, Profile, ProfileChanges, ProfileStore};
pub use safety::{Block, Report, ReportReason, SafetyStore};
pub use users::{UserRecord, UserStore};
