//! Bundled site adapters
//!
//! Each adapter module is registered here with one explicit call. Adding a
//! site means adding a module and a `register` line.

mod firefox;
mod inmyprime;
mod instagram;
mod tatacliq;
mod virgio;

pub use firefox::Firefox;
pub use inmyprime::InMyPrime;
pub use instagram::Instagram;
pub use tatacliq::TataCliq;
pub use virgio::Virgio;

use crate::adapter::{CheckerRegistry, CrawlAdapter, CrawlerRegistry};
use crate::check::AvailabilityAdapter;
use crate::ScoutError;

/// Registers the bundled product crawlers
pub fn register_crawlers(registry: &mut CrawlerRegistry) -> Result<(), ScoutError> {
    registry.register("virgio", || Box::new(Virgio::default()) as Box<dyn CrawlAdapter>)?;
    registry.register("tatacliq", || Box::new(TataCliq::default()) as Box<dyn CrawlAdapter>)?;
    registry.register("inmyprime", || Box::new(InMyPrime::default()) as Box<dyn CrawlAdapter>)?;
    Ok(())
}

/// Registers the bundled availability checkers
pub fn register_checkers(registry: &mut CheckerRegistry) -> Result<(), ScoutError> {
    registry.register("instagram", || {
        Box::new(Instagram::default()) as Box<dyn AvailabilityAdapter>
    })?;
    registry.register("firefox", || {
        Box::new(Firefox::default()) as Box<dyn AvailabilityAdapter>
    })?;
    Ok(())
}

/// Registry holding every bundled crawler
pub fn crawlers() -> Result<CrawlerRegistry, ScoutError> {
    let mut registry = CrawlerRegistry::new();
    register_crawlers(&mut registry)?;
    Ok(registry)
}

/// Registry holding every bundled checker
pub fn checkers() -> Result<CheckerRegistry, ScoutError> {
    let mut registry = CheckerRegistry::new();
    register_checkers(&mut registry)?;
    Ok(registry)
}
