//! Core data structures: the board grid, block shapes and colors.
//!
//! These types carry no game rules of their own. The rules that move blocks
//! around and decide when rows clear live in [`crate::engine`].

pub use self::{board::*, color::*, shape::*};

pub(crate) mod board;
pub(crate) mod color;
pub(crate) mod shape;
