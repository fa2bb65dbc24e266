pub mod clock;
pub mod quote_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use quote_service::{PastHoursFilter, QuoteCreated, QuoteService};
