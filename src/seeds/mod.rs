pub mod default_users_seed;

pub use default_users_seed::*;
