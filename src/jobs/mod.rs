// Jobs module - discovered listings and the strict listing micro-format

pub mod models;
pub mod parser;

pub use models::{GroundingLink, JobPosting, TailoredApplication};
pub use parser::{parse_listings, ListingParseError};
