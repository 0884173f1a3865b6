//! Gameplay engine for a single-player wave shooter on an 84×48 monochrome
//! panel driven by a two-axis stick, a speed knob and one button.
//!
//! The crate is split the same way the game runs: static data
//! ([`sprites`], [`config`]), the mutable world ([`entities`]), the
//! per-source handlers ([`compute`], [`bullets`], [`wave`], [`boss`],
//! [`fsm`]) and the cooperative loop that ties them together
//! ([`scheduler`]). Hardware lives behind the traits in [`board`].

pub mod board;
pub mod boss;
pub mod bullets;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod sprites;
pub mod wave;

pub use board::{Board, Controls, FrameBuffer, InputSample};
pub use config::{PhaseId, PhaseTable};
pub use entities::{Outcome, World};
pub use error::ConfigError;
pub use scheduler::{Clock, Engine, Flow, RunEnd, Signals, Source, SystemClock, Timers};
