pub mod attendance;
pub mod listing;
pub mod report;
pub mod reservation;

pub use crate::domain::model::{Gift, GiftOrder, ReservationOutcome, ReservedGift};
pub use crate::domain::ports::{ConfigProvider, GiftStore, GuestStore};
pub use crate::utils::error::Result;
