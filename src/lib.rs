pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod location;
pub mod navigation;
pub mod output;
pub mod records;
pub mod session;

#[cfg(test)]
mod tests;
