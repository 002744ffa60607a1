//! todAI: a task manager with a REST backend and a terminal client.
//!
//! The server side is [`http`] over [`application`] over [`infrastructure`];
//! the client side is [`client`] (HTTP transport plus cache) under [`ui`].
//! Both share the types and validation rules in [`domain`].

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;
pub mod ui;
