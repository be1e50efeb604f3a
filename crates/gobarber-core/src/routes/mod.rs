//! Route protection.
//!
//! The guard does not own a routing table. Callers describe each route with
//! a [`Route`] (path plus [`Access`] flag) and ask the guard what to do with
//! it given the current session.
//!
//! - `guard::decide`: the pure (access, session presence) decision
//! - `Navigator`: tracks the current view and re-evaluates it when the
//!   session changes

pub mod guard;
pub mod navigator;

pub use guard::{decide, Access, Decision, Route, SIGN_IN_PATH};
pub use navigator::{Navigator, View};
