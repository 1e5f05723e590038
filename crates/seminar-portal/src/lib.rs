//! Domain library for the company seminar registration portal.
//!
//! Administrators publish seminars and manage their lifecycle, employees
//! browse and apply, and the dashboard aggregates activity for review. The
//! HTTP service crate wires the routers exposed here onto concrete stores.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
