pub mod preferences;

pub use preferences::{
    AppSettings, Theme, MAX_RECENT_SEARCHES, PROMO_DISMISS_DAYS, PROMO_INTERVAL_DAYS,
};
