pub mod matches;
pub mod profiles;
pub mod safety;

pub use matches::MatchService;
pub use profiles::{ProfilePayload, ProfileService};
pub use safety::SafetyService;
