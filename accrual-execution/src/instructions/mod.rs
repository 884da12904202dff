pub mod admin;
pub mod cross_chain;
pub mod dividends;
pub mod token;
