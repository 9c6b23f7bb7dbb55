pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::postgrest::PostgrestStore;
pub use config::site_config::SiteConfig;
pub use crate::core::{
    attendance::RsvpService, listing::GiftListing, report::GiftReport,
    reservation::ReservationProtocol,
};
pub use domain::model::{
    Attendance, Companion, CompanionId, Gift, GiftId, GiftOrder, Guest, GuestId,
    ReservationOutcome, ReservedGift,
};
pub use utils::error::{Result, SiteError};
