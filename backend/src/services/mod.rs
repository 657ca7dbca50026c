pub mod growth;
pub mod sentiment;
pub mod streak;
