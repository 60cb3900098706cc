//! Central place for all default values.
//! Update these and the whole app picks them up.

use std::time::Duration;

pub struct Defaults;

impl Defaults {
    /* Calculation service */
    pub const API_BASE_URL: &'static str = "http://localhost:5000";

    /* Local state */
    pub const STATE_DIR: &'static str = "./.wireless-calc";
    pub const EXPORT_DIR: &'static str = "./exports";
    pub const LOG_FILE_NAME: &'static str = "wireless-calc.log";
    pub const STORAGE_KEY_PREFIX: &'static str = "wireless-app-";

    /* UI */
    pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);
    pub const TICK: Duration = Duration::from_millis(250);
    pub const EXPORT_FILE_PREFIX: &'static str = "wireless-calculation";
}
