//! Built-in rules realizing spec §8 scenarios S1-S4.

mod generic_link_text;
mod geographic_capitalization;
mod invalid_version_prefix;
mod names_and_titles;
mod product_first_mention;

pub use generic_link_text::GenericLinkText;
pub use geographic_capitalization::GeographicCapitalization;
pub use invalid_version_prefix::InvalidVersionPrefix;
pub use names_and_titles::NamesAndTitles;
pub use product_first_mention::FirstMentionProductName;
