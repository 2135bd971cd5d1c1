//! Typed errors for replay setup.
//!
//! Almost nothing in the replay loop is fatal: bad ticks are skipped, gate
//! rejections and risk refusals are ordinary outputs. The exceptions live
//! here.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a replay run before or during setup.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// No trading days exist between the requested dates. Without a
    /// calendar there is nothing to replay.
    #[error("no trading days between {start} and {end}")]
    EmptyCalendar { start: NaiveDate, end: NaiveDate },
}
