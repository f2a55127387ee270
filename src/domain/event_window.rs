//! Event start/end window and the derived "finished" state.
//!
//! Whether an event is finished is never stored: it is computed from
//! `end_datetime` against the clock at read time.

use chrono::NaiveDateTime;

use crate::error::ExplorerError;

/// Validated `[start, end)` interval of an event.
///
/// Timestamps are naive and interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl EventWindow {
    /// Builds a window, rejecting one that does not end after it starts.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] if `end <= start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ExplorerError> {
        if end <= start {
            return Err(ExplorerError::InvalidRequest(
                "end_datetime must be later than start_datetime".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Start of the event.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End of the event.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// An event is finished once its end is not in the future.
#[must_use]
pub fn is_finished(end: NaiveDateTime, now: NaiveDateTime) -> bool {
    end <= now
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> NaiveDateTime {
        let Ok(ts) = s.parse::<NaiveDateTime>() else {
            panic!("bad timestamp {s}");
        };
        ts
    }

    #[test]
    fn end_must_follow_start() {
        let start = at("2030-01-01T10:00:00");
        assert!(EventWindow::new(start, start).is_err());
        assert!(EventWindow::new(start, start - Duration::minutes(1)).is_err());
        assert!(EventWindow::new(start, start + Duration::hours(2)).is_ok());
    }

    #[test]
    fn finished_is_evaluated_at_read_time() {
        let Ok(window) = EventWindow::new(at("2030-01-01T10:00:00"), at("2030-01-01T12:00:00"))
        else {
            panic!("valid window");
        };
        assert!(!is_finished(window.end(), at("2030-01-01T11:59:59")));
        assert!(is_finished(window.end(), at("2030-01-01T12:00:00")));
        assert!(is_finished(window.end(), at("2031-01-01T00:00:00")));
    }

    #[test]
    fn fractional_seconds_parse() {
        let ts = at("2030-01-01T10:00:00.000000");
        assert_eq!(ts, at("2030-01-01T10:00:00"));
    }
}
