use windows_sys::Win32::Foundation::{GetLastError, SetLastError, ERROR_SUCCESS};

use crate::OsError;

/// Returns the last error code that occured on the current thread, attributed to `function`.
#[inline]
pub fn last_error(function: &'static str) -> OsError {
    OsError::new(function, unsafe { GetLastError() })
}

/// Resets the last error code of the current thread.
#[inline]
pub fn clear_last_error() {
    unsafe { SetLastError(ERROR_SUCCESS) };
}

/// Writes the system message associated with `code` to `buf`, as a raw UTF-16 string.
pub fn read_message(code: u32, buf: &mut [u16]) -> Option<usize> {
    use windows_sys::Win32::System::Diagnostics::Debug::*;

    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            std::ptr::null(),
            code,
            0,
            buf.as_mut_ptr(),
            buf.len() as u32,
            std::ptr::null_mut(),
        )
    };

    if len == 0 {
        None
    } else {
        Some(len as usize)
    }
}

/// Returns the system message associated with `code`, if the system knows one.
pub fn describe(code: u32) -> Option<String> {
    let mut buf = Box::new([0u16; 1024]);
    let len = read_message(code, buf.as_mut())?;
    String::from_utf16(&buf[..len]).ok()
}
