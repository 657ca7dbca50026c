pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod rate_limit;
