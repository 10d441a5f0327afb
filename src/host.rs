//! Host collaborator contract
//!
//! The embedding wiki engine supplies the user object mutated after a
//! successful authentication and the clock used to stamp it. Both are
//! modeled as traits so the adapter never touches engine internals.

use chrono::{DateTime, Utc};

/// Mutable view of the wiki's user object
pub trait WikiUser {
    /// Set the user's display name
    fn set_real_name(&mut self, real_name: &str);

    /// Set the user's email address
    fn set_email(&mut self, email: &str);

    /// Stamp the email-verified timestamp, 14-digit UTC form
    fn set_email_authenticated(&mut self, timestamp: &str);

    /// Persist the user through the engine's own save routine
    fn save_settings(&mut self);
}

/// Current-time provider
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format an instant in the wiki's 14-digit timestamp form
pub fn wiki_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wiki_timestamp_format() {
        let instant = Utc.with_ymd_and_hms(2015, 5, 12, 20, 10, 53).unwrap();
        assert_eq!(wiki_timestamp(instant), "20150512201053");
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
