//! # action-dispatch-std
//!
//! Registry, resolution engine and dispatcher for action-dispatch.
//!
//! This crate provides:
//! - **Storage**: [`Registry`](registry::Registry) with a configurable
//!   [`DuplicatePolicy`](registry::DuplicatePolicy)
//! - **Resolution**: most-specific-pattern selection with global fallback
//! - **Dispatch**: the thread-safe [`Dispatcher`](dispatcher::Dispatcher)
//!   and its [`DispatcherBuilder`](builder::DispatcherBuilder)
//! - **Caching**: an optional LRU cache of resolution outcomes
//! - **Hooks**: handler wrappers such as [`TracingHandler`](hooks::TracingHandler)
//! - **Testing**: recording and counting handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use action_dispatch_core;

// Modules
pub mod builder;
pub mod cache;
pub mod dispatcher;
pub mod hooks;
pub mod registry;
mod resolve;
pub mod route;
pub mod testing;
