//! Profile procedures: the onboarding and profile-editing mutations plus the
//! joined profile read.

pub mod handlers;
pub mod procedures;
pub mod reconcile;
