pub mod health;
pub mod login;
pub mod media;

pub use health::health;
pub use login::login;
