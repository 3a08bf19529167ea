pub mod user;

pub use user::*;

pub use user::UserError;
