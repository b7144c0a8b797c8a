pub mod categories;
pub mod manager;
pub mod models;
pub mod products;
pub mod query_builder;
pub mod reviews;
pub mod stats;
pub mod users;

pub use categories::CategoryRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use products::ProductRepository;
pub use query_builder::QueryBuilder;
pub use reviews::ReviewRepository;
pub use stats::{DashboardStats, StatsRepository};
pub use users::{NewUser, UserRepository};
