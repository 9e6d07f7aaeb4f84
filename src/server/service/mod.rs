//! Service layer for the sign-in flow and the submission write path.
//!
//! Services sit between the HTTP controllers and the provider clients, combining several
//! provider calls into one operation and translating their failures into the application's
//! error type.

pub mod auth;
/// Form submission to the row store.
pub mod submission;
