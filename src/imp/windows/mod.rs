//! The implementation of the [`wndbridge`](crate) crate for Windows.

use windows_sys::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, TranslateMessage, MSG,
};

use crate::{
    ClassDescriptor, ClassResources, Error, Fetch, InstanceHandle, OsError, Platform, RawHandle,
    WindowCreateInfo, WindowProcedure,
};

mod error;
mod hwnd;
mod wndproc;

pub use self::error::describe;

/// The platform backed by the Win32 API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32;

/// The platform of the current operating system.
pub type NativePlatform = Win32;

impl Platform for Win32 {
    type Message = MSG;

    #[inline]
    fn is_supported(&self) -> bool {
        true
    }

    fn initialize_apartment(&self) -> Result<(), Error> {
        let hr = unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED as _) };

        // `S_FALSE` means the thread already was in an apartment. It still has to be balanced.
        if hr < 0 {
            Err(OsError::new("CoInitializeEx", hr as u32).into())
        } else {
            Ok(())
        }
    }

    #[inline]
    fn uninitialize_apartment(&self) {
        unsafe { CoUninitialize() };
    }

    fn module_handle(&self) -> Result<InstanceHandle, Error> {
        let module = unsafe { GetModuleHandleW(std::ptr::null()) };

        if module == 0 {
            Err(error::last_error("GetModuleHandleW").into())
        } else {
            Ok(InstanceHandle(module))
        }
    }

    #[inline]
    fn class_resources(&self) -> Result<ClassResources, Error> {
        hwnd::class_resources()
    }

    #[inline]
    fn window_procedure(&self) -> WindowProcedure {
        wndproc::wndproc
    }

    #[inline]
    fn register_class(&self, class: &ClassDescriptor) -> Result<(), OsError> {
        hwnd::register_class(class)
    }

    #[inline]
    fn unregister_class(&self, name: &str, instance: InstanceHandle) {
        hwnd::unregister_class(name, instance);
    }

    #[inline]
    fn create_window(
        &self,
        class: &str,
        info: &WindowCreateInfo,
        instance: InstanceHandle,
    ) -> Result<RawHandle, OsError> {
        hwnd::create_window(class, info, instance)
    }

    #[inline]
    fn destroy_window(&self, window: RawHandle) {
        hwnd::destroy_window(window);
    }

    fn new_message(&self) -> MSG {
        // SAFETY: `MSG` is plain old data, all zeroes is a valid value.
        unsafe { std::mem::zeroed() }
    }

    fn next_message(&self, message: &mut MSG) -> Fetch {
        match unsafe { GetMessageW(message, 0, 0, 0) } {
            -1 => Fetch::Failed(error::last_error("GetMessageW")),
            0 => Fetch::Quit,
            _ => Fetch::Message,
        }
    }

    fn dispatch_message(&self, message: &MSG) {
        unsafe {
            TranslateMessage(message);
            DispatchMessageW(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use windows_sys::Win32::UI::WindowsAndMessaging as wm;

    use crate::{message, ClassStyle, WindowCreateInfo, WindowStyles};

    #[test]
    fn message_numbers_match_the_system() {
        assert_eq!(message::WM_MOVE, wm::WM_MOVE);
        assert_eq!(message::WM_SIZE, wm::WM_SIZE);
        assert_eq!(message::WM_ACTIVATE, wm::WM_ACTIVATE);
        assert_eq!(message::WM_SETFOCUS, wm::WM_SETFOCUS);
        assert_eq!(message::WM_KILLFOCUS, wm::WM_KILLFOCUS);
        assert_eq!(message::WM_CLOSE, wm::WM_CLOSE);
        assert_eq!(message::WM_CAPTURECHANGED, wm::WM_CAPTURECHANGED);
    }

    #[test]
    fn class_styles_match_the_system() {
        assert_eq!(ClassStyle::VREDRAW.bits(), wm::CS_VREDRAW);
        assert_eq!(ClassStyle::HREDRAW.bits(), wm::CS_HREDRAW);
        assert_eq!(ClassStyle::OWNDC.bits(), wm::CS_OWNDC);
        assert_eq!(ClassStyle::NOCLOSE.bits(), wm::CS_NOCLOSE);
    }

    #[test]
    fn window_styles_match_the_system() {
        assert_eq!(WindowStyles::VISIBLE.bits(), wm::WS_VISIBLE);
        assert_eq!(WindowStyles::CAPTION.bits(), wm::WS_CAPTION);
        assert_eq!(WindowStyles::SYSMENU.bits(), wm::WS_SYSMENU);
        assert_eq!(WindowStyles::SIZE_BOX.bits(), wm::WS_SIZEBOX);
        assert_eq!(WindowStyles::MINIMIZE_BOX.bits(), wm::WS_MINIMIZEBOX);
        assert_eq!(WindowStyles::MAXIMIZE_BOX.bits(), wm::WS_MAXIMIZEBOX);

        let fixed = WindowStyles::for_window(&WindowCreateInfo::default());
        assert_eq!(
            fixed.bits(),
            wm::WS_VISIBLE | wm::WS_CAPTION | wm::WS_SYSMENU | wm::WS_MINIMIZEBOX
        );
    }

    #[test]
    fn system_messages_are_described() {
        // ERROR_FILE_NOT_FOUND
        assert!(super::describe(2).is_some());
    }
}
