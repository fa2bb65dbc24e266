pub mod quote;

pub use quote::{PastHoursQuery, PremiumsResponse, QuoteCreatedResponse, QuoteForm};
