//! The [`wndbridge`](self) crate registers native window classes, pumps the Win32 message
//! loop and translates the messages it receives into a small, portable event model.
//!
//! The entry points are [`Environment`], which owns every native resource of the process, and
//! [`Driver`], a lazy facade over it.

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

mod bridge;
mod class;
mod config;
mod driver;
mod environment;
mod error;
mod event;
mod message;
mod platform;
mod registry;
mod window;

pub use self::bridge::handle_message;
pub use self::class::*;
pub use self::config::*;
pub use self::driver::*;
pub use self::environment::*;
pub use self::error::*;
pub use self::event::*;
pub use self::message::*;
pub use self::platform::*;
pub use self::registry::*;
pub use self::window::*;

#[cfg_attr(target_os = "windows", path = "imp/windows/mod.rs")]
#[cfg_attr(not(target_os = "windows"), path = "imp/unsupported.rs")]
mod imp;

/// The native backend of the current operating system.
pub type NativePlatform = imp::NativePlatform;

#[cfg(test)]
mod mock;
