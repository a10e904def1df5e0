use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::UI::WindowsAndMessaging::DefWindowProcW;

use crate::Reply;

/// The window procedure installed on every class registered by this crate.
///
/// The procedure keeps no state of its own: the message bridge finds the window the message is
/// about and decides whether the default procedure must run.
pub unsafe extern "system" fn wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match crate::handle_message(hwnd, msg, wparam, lparam) {
        Reply::Handled => 0,
        Reply::Default => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
