pub mod mentorship;
pub mod roster;
