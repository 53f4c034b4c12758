pub mod client;

pub use client::ClientRecord;
