pub mod docs;
pub mod quote;
