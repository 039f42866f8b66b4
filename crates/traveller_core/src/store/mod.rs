pub mod lost_found;
pub mod query;
pub mod session;
pub mod travel;

pub use lost_found::{LostFoundState, LostFoundStore};
pub use query::{with_retry, AlertsStore, QueryOutcome, SuggestionsStore};
pub use session::{acquire_position, SessionStore};
pub use travel::{TravelDesk, TripPlanState, TripPlanStore};
