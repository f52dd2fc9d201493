//! courier-core
//!
//! Building blocks for the search-index event pipeline and the push
//! notification dispatcher.
//!
//! - **domain**: queue items, events, batches, notifications, typed ids
//! - **ports**: pull queue, decoder, search indexes, id generator, clock, sinks
//! - **chain**: event handlers and the ordered handler chain
//! - **notify**: message providers, dispatcher and notifier
//! - **app**: configuration, queue leaser, scheduler, builder
//! - **impls**: in-memory and JSON adapters for development and tests

pub mod app;
pub mod chain;
pub mod domain;
pub mod impls;
pub mod notify;
pub mod ports;
