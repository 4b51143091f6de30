pub mod gate;
pub mod users;
