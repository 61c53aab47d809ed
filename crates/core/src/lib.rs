pub mod api;
pub mod config;
pub mod cypher;
pub mod examples;
pub mod model;
pub mod state;
pub mod view;
