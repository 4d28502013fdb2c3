pub mod app;
pub mod application;
pub mod cli;
pub mod resource;
pub mod template;
