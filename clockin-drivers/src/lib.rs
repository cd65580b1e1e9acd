//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver client and page/element helpers the
//! attendance flow uses to interact with the portal.
//!
//! - [`clockin_browser::driver::PortalDriver`]: WebDriver client wrapper
//! - [`clockin_browser::page::PortalPage`]: DOM queries with fallback chains
//! - [`clockin_browser::cadence::Cadence`]: human-like timings and typing
//! - [`clockin_browser::hardening`]: browser arguments and JS evasions
pub mod clockin_browser;
