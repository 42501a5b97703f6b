pub mod admin;
pub mod common;
pub mod query;
pub mod replay;
pub mod stake;
