pub mod command;
pub mod config;
pub mod fetch;
pub mod run;
