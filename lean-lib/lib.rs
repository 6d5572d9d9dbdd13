//! Unicode abbreviation input for Lean buffers.
//!
//! The engine rewrites leader-prefixed ASCII sequences (`\alpha`) into
//! unicode glyphs (`α`) while the user types. It is split into:
//!
//! - [`table`]: the abbreviation table and its derived prefix set.
//! - [`matcher`]: pure queries over a table (prefix, completeness, shortest
//!   match).
//! - [`session`]: the per-buffer typing state machine.
//! - [`commit`]: turning a replacement into an atomic buffer edit.
//!
//! [`input`] wires those together into a host that owns one session per
//! [`document::Document`].

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod commit;
pub mod defaults;
pub mod document;
pub mod input;
pub mod matcher;
pub mod registry;
pub mod session;
pub mod store;
pub mod table;
pub mod transaction;

pub type Tendril = SmartString<LazyCompact>;
