//! Minimal event-loop runtime for ratatui applications.
//!
//! [`Runtime::run`] owns the terminal for the lifetime of an [`App`] and
//! feeds it three kinds of events: ticks carrying the real time elapsed since
//! the previous tick, render requests, and raw crossterm events.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
