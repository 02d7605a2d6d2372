//! Configuration module

mod site;

pub use site::MissingDateConfig;
pub use site::MissingDatePolicy;
pub use site::PrismicConfig;
pub use site::SiteConfig;
pub use site::{ENV_ACCESS_TOKEN, ENV_API_ENDPOINT};
