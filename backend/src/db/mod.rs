mod pool;

pub use pool::{create_memory_pool, create_pool, ping, run_migrations};
