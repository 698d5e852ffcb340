//! `SeaORM` entities for the Korfinder data model.
//!
//! Relationship graph: a user owns at most one preference row, many
//! listings, many sent/received swipes and many matches (as either side);
//! subjects are shared via the `user_subject` join table; messages hang off
//! matches.

pub mod listing;
pub mod match_pair;
pub mod message;
pub mod preference;
pub mod subject;
pub mod swipe;
pub mod user;
pub mod user_subject;

/// User role values stored in `users.role`.
pub mod role {
    pub const STUDENT: &str = "student";
    pub const TUTOR: &str = "tutor";
}
