// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Collection of clock implementations.
//!
//! Services take a `Clock` instead of querying the system time directly so that tests can control
//! the timestamps recorded for new entities.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();

        // Timestamps are stored with microsecond resolution in PostgreSQL so truncate them here
        // to keep what we return to clients identical to what we read back later.
        let nanos = nanos / 1000 * 1000;

        OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// A clock that starts at a given instant and advances by one second every time it is queried.
    ///
    /// Useful to get predictable and strictly increasing creation times for entities.
    pub struct MonotonicClock {
        /// Seconds since the epoch that the next call to `now_utc` returns.
        next_sec: AtomicI64,
    }

    impl MonotonicClock {
        /// Creates a new clock whose first reading is `start_sec` seconds since the epoch.
        pub fn new(start_sec: i64) -> Self {
            Self { next_sec: AtomicI64::new(start_sec) }
        }
    }

    impl Clock for MonotonicClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now = self.next_sec.fetch_add(1, Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp(now).unwrap()
        }
    }

}
