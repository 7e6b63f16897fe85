pub mod client;

pub use client::{Builder, JsonClient};
