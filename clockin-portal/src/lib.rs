//! Attendance sign-in flow against the HR portal.
//!
//! Everything site-dependent (selectors, widget tags, phrases) lives in
//! [`markup::PortalMarkup`] so it can be swapped when the portal's front-end
//! changes; the stage modules only talk to the page through that inventory.
//!
//! - [`flow::AttendanceFlow`]: one full run, browser acquired and released
//! - [`login`]: credential entry and form submission
//! - [`attendance`]: sign-in button and work-location modal handling
//! - [`verify`]: heuristic outcome classification
//! - [`diagnostics`]: per-stage screenshot/page-source artifacts
pub mod attendance;
pub mod diagnostics;
pub mod flow;
pub mod login;
pub mod markup;
pub mod scripts;
pub mod verify;

pub use diagnostics::{FsDiagnostics, NullSink, StageSink};
pub use flow::AttendanceFlow;
pub use markup::PortalMarkup;
