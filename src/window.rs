use bitflags::bitflags;

use crate::{ClassHandle, InstanceHandle, RawHandle, WindowCreateInfo, WindowId};

bitflags! {
    /// The styles of a window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowStyles: u32 {
        /// The window is initially visible.
        const VISIBLE = 0x1000_0000;
        /// The window has a title bar.
        const CAPTION = 0x00C0_0000;
        /// The window has a window menu on its title bar.
        const SYSMENU = 0x0008_0000;
        /// The window has a sizing border.
        const SIZE_BOX = 0x0004_0000;
        /// The window has a minimize button.
        const MINIMIZE_BOX = 0x0002_0000;
        /// The window has a maximize button.
        const MAXIMIZE_BOX = 0x0001_0000;
    }
}

impl WindowStyles {
    /// Converts the window parameters into the corresponding window styles.
    pub fn for_window(info: &WindowCreateInfo) -> Self {
        let mut styles = Self::VISIBLE | Self::CAPTION | Self::SYSMENU | Self::MINIMIZE_BOX;

        if info.resizable {
            styles |= Self::MAXIMIZE_BOX | Self::SIZE_BOX;
        }

        styles
    }
}

/// A live native window, owned by an [`Environment`](crate::Environment).
#[derive(Debug)]
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) handle: RawHandle,
    pub(crate) info: WindowCreateInfo,
    pub(crate) class: ClassHandle,
}

impl Window {
    /// The identifier carried by the events of this window.
    #[inline]
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The native handle of the window.
    #[inline]
    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    /// The parameters the window was created with.
    #[inline]
    pub fn info(&self) -> &WindowCreateInfo {
        &self.info
    }

    /// The class the window was created from.
    #[inline]
    pub fn class(&self) -> &ClassHandle {
        &self.class
    }

    /// The module owning the window.
    #[inline]
    pub fn instance(&self) -> InstanceHandle {
        self.class.instance()
    }
}

#[cfg(all(target_os = "windows", feature = "raw-window-handle"))]
impl rwh::HasWindowHandle for Window {
    fn window_handle(&self) -> Result<rwh::WindowHandle<'_>, rwh::HandleError> {
        use std::num::NonZeroIsize;

        let hwnd = NonZeroIsize::new(self.handle).ok_or(rwh::HandleError::Unavailable)?;

        let mut raw = rwh::Win32WindowHandle::new(hwnd);
        raw.hinstance = NonZeroIsize::new(self.instance().0);

        // SAFETY:
        //  The environment destroys the native window only after the `Window` is removed from
        //  it, so the handle stays valid for as long as `self` is borrowed.
        let handle = unsafe { rwh::WindowHandle::borrow_raw(raw.into()) };

        Ok(handle)
    }
}

#[cfg(all(target_os = "windows", feature = "raw-window-handle"))]
impl rwh::HasDisplayHandle for Window {
    fn display_handle(&self) -> Result<rwh::DisplayHandle<'_>, rwh::HandleError> {
        let raw = rwh::WindowsDisplayHandle::new();

        // SAFETY:
        //  See the safety note in the `HasWindowHandle` implementation.
        let handle = unsafe { rwh::DisplayHandle::borrow_raw(raw.into()) };

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_window_styles() {
        let styles = WindowStyles::for_window(&WindowCreateInfo::default());
        assert!(styles.contains(WindowStyles::VISIBLE | WindowStyles::CAPTION));
        assert!(!styles.intersects(WindowStyles::SIZE_BOX | WindowStyles::MAXIMIZE_BOX));
    }

    #[test]
    fn resizable_window_styles() {
        let info = WindowCreateInfo {
            resizable: true,
            ..WindowCreateInfo::default()
        };

        let styles = WindowStyles::for_window(&info);
        assert!(styles.contains(WindowStyles::SIZE_BOX | WindowStyles::MAXIMIZE_BOX));
    }
}
