pub mod admin;

pub use admin::{make_admin, users};
