//! Shared helpers for the acceptor integration tests.

#![allow(dead_code, unused_imports)]

mod client;
mod listener;
mod observer;

pub use client::{
    header_value, random_key, read_response, request, request_to, send_request, valid_request,
};
pub use listener::ScriptedListener;
pub use observer::{Event, RecordingObserver};
