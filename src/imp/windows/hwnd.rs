use windows_sys::Win32::Foundation::{HWND, RECT};
use windows_sys::Win32::Graphics::Gdi::{GetSysColorBrush, COLOR_WINDOW};
use windows_sys::Win32::UI::WindowsAndMessaging::*;

use super::error::{clear_last_error, last_error};
use crate::{
    ClassDescriptor, ClassResources, Error, InstanceHandle, OsError, WindowCreateInfo,
    WindowStyles,
};

/// Loads the stock cursor, icon and brush shared by every registered class.
pub fn class_resources() -> Result<ClassResources, Error> {
    let cursor = unsafe { LoadCursorW(0, IDC_ARROW) };
    if cursor == 0 {
        return Err(Error::StructureAllocation("could not load the default cursor"));
    }

    let icon = unsafe { LoadIconW(0, IDI_APPLICATION) };
    if icon == 0 {
        return Err(Error::StructureAllocation("could not load the application icon"));
    }

    let background = unsafe { GetSysColorBrush(COLOR_WINDOW as _) };
    if background == 0 {
        return Err(Error::StructureAllocation("could not get the window color brush"));
    }

    Ok(ClassResources {
        cursor,
        icon,
        background,
    })
}

/// Registers the described class.
pub fn register_class(class: &ClassDescriptor) -> Result<(), OsError> {
    let name = make_utf16(&class.name);

    let info = WNDCLASSW {
        style: class.style.bits(),
        lpfnWndProc: class.procedure,
        cbClsExtra: class.class_extra,
        cbWndExtra: class.window_extra,
        hInstance: class.instance.0,
        hIcon: class.icon,
        hCursor: class.cursor,
        hbrBackground: class.background,
        lpszMenuName: std::ptr::null(),
        lpszClassName: name.as_ptr(),
    };

    // The system copies the class name, `name` only has to live until the call returns.
    let atom = unsafe { RegisterClassW(&info) };

    if atom == 0 {
        Err(last_error("RegisterClassW"))
    } else {
        Ok(())
    }
}

/// Unregisters the class named `name`.
pub fn unregister_class(name: &str, instance: InstanceHandle) {
    let wide = make_utf16(name);

    if unsafe { UnregisterClassW(wide.as_ptr(), instance.0) } == 0 {
        log::warn!(
            "could not unregister window class `{name}`: {}",
            last_error("UnregisterClassW")
        );
    }
}

/// Creates a window of the class named `class`.
pub fn create_window(
    class: &str,
    info: &WindowCreateInfo,
    instance: InstanceHandle,
) -> Result<HWND, OsError> {
    let styles = WindowStyles::for_window(info);
    let (width, height) = client_to_window_size(styles, info.width, info.height)?;
    let class = make_utf16(class);
    let title = make_utf16(&info.title);

    let hwnd = unsafe {
        CreateWindowExW(
            0,
            class.as_ptr(),
            title.as_ptr(),
            styles.bits(),
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            0,
            0,
            instance.0,
            std::ptr::null(),
        )
    };

    if hwnd == 0 {
        Err(last_error("CreateWindowExW"))
    } else {
        Ok(hwnd)
    }
}

/// Destroys a window.
pub fn destroy_window(hwnd: HWND) {
    if unsafe { DestroyWindow(hwnd) } == 0 {
        log::warn!(
            "could not destroy window {hwnd:#x}: {}",
            last_error("DestroyWindow")
        );
    }
}

/// Computes the outer size of a window whose client area has the requested size.
fn client_to_window_size(
    styles: WindowStyles,
    width: u32,
    height: u32,
) -> Result<(i32, i32), OsError> {
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: width.min(i32::MAX as u32) as i32,
        bottom: height.min(i32::MAX as u32) as i32,
    };

    clear_last_error();

    if unsafe { AdjustWindowRect(&mut rect, styles.bits(), 0) } == 0 {
        return Err(last_error("AdjustWindowRect"));
    }

    Ok((rect.right - rect.left, rect.bottom - rect.top))
}

/// Creates a null-terminated UTF-16 string from the given Rust string.
fn make_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}
