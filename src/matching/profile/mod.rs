//! Profile extraction from conversation history.

pub mod interests;
pub mod personality;
pub mod updater;

pub use interests::{InterestCount, InterestExtractor};
pub use personality::{PersonalityAnalyzer, ProfileDescription};
pub use updater::{ProfileUpdate, ProfileUpdater};
