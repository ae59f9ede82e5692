//! Client-side transport: one WebSocket connection to the relay server

pub mod client;

pub use client::Connection;
