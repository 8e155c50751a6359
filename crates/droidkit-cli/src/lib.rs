pub mod logger;
pub mod output;
