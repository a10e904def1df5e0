//! Decoding of the raw window messages the bridge cares about.

use crate::WindowEvent;

/// `WM_MOVE`
pub const WM_MOVE: u32 = 0x0003;
/// `WM_SIZE`
pub const WM_SIZE: u32 = 0x0005;
/// `WM_ACTIVATE`
pub const WM_ACTIVATE: u32 = 0x0006;
/// `WM_SETFOCUS`
pub const WM_SETFOCUS: u32 = 0x0007;
/// `WM_KILLFOCUS`
pub const WM_KILLFOCUS: u32 = 0x0008;
/// `WM_CLOSE`
pub const WM_CLOSE: u32 = 0x0010;
/// `WM_CAPTURECHANGED`
pub const WM_CAPTURECHANGED: u32 = 0x0215;

/// `WA_ACTIVE`, the only activation code reported as [`WindowEvent::Shown`].
const WA_ACTIVE: u32 = 1;

/// Subtracted from 16-bit words above `i16::MAX` to recover their signed value.
const SIGN_CORRECTION: i32 = 0x1_0000;

/// Returns the low-order word of `value`, interpreted as a signed 16-bit integer.
#[inline]
pub const fn lo_word(value: isize) -> i32 {
    sign_extend((value & 0xFFFF) as i32)
}

/// Returns the high-order word of the low 32 bits of `value`, interpreted as a signed 16-bit
/// integer.
#[inline]
pub const fn hi_word(value: isize) -> i32 {
    sign_extend(((value >> 16) & 0xFFFF) as i32)
}

#[inline]
const fn sign_extend(word: i32) -> i32 {
    if word > i16::MAX as i32 {
        word - SIGN_CORRECTION
    } else {
        word
    }
}

/// Packs two 16-bit words the way the system does for `lParam`.
#[inline]
pub const fn make_lparam(lo: i32, hi: i32) -> isize {
    (((hi as u32 & 0xFFFF) << 16) | (lo as u32 & 0xFFFF)) as isize
}

/// A decoded window message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// `WM_CLOSE`
    Close,
    /// `WM_SETFOCUS`
    SetFocus,
    /// `WM_KILLFOCUS`
    KillFocus,
    /// `WM_MOVE`, with the new position of the client area.
    Move {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// `WM_ACTIVATE`, with the low-order word of `wParam`.
    Activate {
        /// The activation code.
        code: u32,
    },
    /// `WM_CAPTURECHANGED`
    CaptureChanged,
    /// `WM_SIZE`, with the raw decoded dimensions (possibly negative).
    Size {
        /// Width of the client area.
        width: i32,
        /// Height of the client area.
        height: i32,
    },
    /// Anything else.
    Other(u32),
}

/// What the window procedure should return to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The message was handled; the procedure returns `0`.
    Handled,
    /// The message must be forwarded to the default window procedure.
    Default,
}

impl Message {
    /// Decodes a raw message.
    pub fn decode(msg: u32, wparam: usize, lparam: isize) -> Self {
        match msg {
            WM_CLOSE => Self::Close,
            WM_SETFOCUS => Self::SetFocus,
            WM_KILLFOCUS => Self::KillFocus,
            WM_MOVE => Self::Move {
                x: lo_word(lparam),
                y: hi_word(lparam),
            },
            WM_ACTIVATE => Self::Activate {
                code: (wparam & 0xFFFF) as u32,
            },
            WM_CAPTURECHANGED => Self::CaptureChanged,
            WM_SIZE => Self::Size {
                width: lo_word(lparam),
                height: hi_word(lparam),
            },
            other => Self::Other(other),
        }
    }

    /// Translates the message into the event it produces, if any, and the reply the window
    /// procedure must give.
    pub fn translate(self) -> (Option<WindowEvent>, Reply) {
        match self {
            Self::Close => (Some(WindowEvent::Closed), Reply::Handled),
            Self::SetFocus => (Some(WindowEvent::FocusReceived), Reply::Handled),
            Self::KillFocus => (Some(WindowEvent::FocusLost), Reply::Handled),
            Self::Move { x, y } => (Some(WindowEvent::Moved { x, y }), Reply::Handled),
            // Activation codes are richer than this, but only `WA_ACTIVE` counts as shown.
            Self::Activate { code: WA_ACTIVE } => (Some(WindowEvent::Shown), Reply::Handled),
            Self::Activate { .. } => (Some(WindowEvent::Hidden), Reply::Handled),
            Self::CaptureChanged => (None, Reply::Handled),
            Self::Size { width, height } => {
                let event = WindowEvent::Resized {
                    width: width.max(0) as u32,
                    height: height.max(0) as u32,
                };
                (Some(event), Reply::Handled)
            }
            Self::Other(_) => (None, Reply::Default),
        }
    }
}
