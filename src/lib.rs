pub mod audit;
pub mod commands;
pub mod config;
pub mod discord;
pub mod dispatcher;
pub mod rewards;
