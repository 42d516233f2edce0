//! Segmentation session.
//!
//! The session state is an immutable [`SessionState`] value. Every change
//! goes through [`reduce`], a pure function of the previous state and an
//! [`Action`]. [`Session`] owns the model and performs the side effects
//! (mosaic building, embedding upload, prediction) before dispatching the
//! resulting actions.

mod controller;
mod reducer;
mod state;

pub use controller::{Session, SessionError, DEFAULT_CLASS_ID};
pub use reducer::{reduce, Action};
pub use state::{Camera, Segmentation, SelectionMode, SessionState};
