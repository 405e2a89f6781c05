mod date_key;
mod devotional;
mod profile;
mod theme;

pub use date_key::{DateKey, DateKeyError};
#[cfg(test)]
pub(crate) use devotional::fixtures;
pub use devotional::{
    DevotionalContent, DevotionalField, DevotionalPatch, GeneratedDevotional,
    EVENING_PRAYER_CLOSING, MORNING_PRAYER_CLOSING,
};
pub use profile::{merge, Preferences, Progress, UserProfile};
pub use theme::Theme;
