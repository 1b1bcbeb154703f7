//! Simile build notification delivery.
//!
//! - [`SimileNotifier`] sends the single end-of-build POST to the Simile
//!   service and turns whatever happens into a [`NotificationOutcome`].
//! - [`LogSink`] is where the human-readable status lines go, typically the
//!   build console.

pub mod delivery;
pub mod sink;

pub use delivery::{NotificationOutcome, NotifyError, SimileNotifier};
pub use sink::{LogSink, WriterSink};
