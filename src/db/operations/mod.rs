pub mod attempts;
pub mod children;
pub mod sessions;

pub use attempts::*;
pub use children::*;
pub use sessions::*;

use chrono::{SecondsFormat, Utc};

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
