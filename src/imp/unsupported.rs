//! The backend of systems without native windows.
//!
//! Every fallible operation fails with [`Error::Unsupported`], so an [`Environment`] can never be
//! constructed on top of it.
//!
//! [`Environment`]: crate::Environment

use crate::{
    ClassDescriptor, ClassResources, Error, Fetch, InstanceHandle, OsError, Platform, RawHandle,
    WindowCreateInfo, WindowProcedure,
};

/// `ERROR_CALL_NOT_IMPLEMENTED`
const NOT_IMPLEMENTED: u32 = 120;

/// No message is ever described on this backend.
#[inline]
pub fn describe(_code: u32) -> Option<String> {
    None
}

/// The platform of systems this crate does not support.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

/// The platform of the current operating system.
pub type NativePlatform = Unsupported;

unsafe extern "system" fn procedure(
    hwnd: RawHandle,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> isize {
    crate::handle_message(hwnd, msg, wparam, lparam);
    0
}

impl Platform for Unsupported {
    type Message = ();

    #[inline]
    fn is_supported(&self) -> bool {
        false
    }

    fn initialize_apartment(&self) -> Result<(), Error> {
        Err(Error::Unsupported)
    }

    fn uninitialize_apartment(&self) {}

    fn module_handle(&self) -> Result<InstanceHandle, Error> {
        Err(Error::Unsupported)
    }

    fn class_resources(&self) -> Result<ClassResources, Error> {
        Err(Error::Unsupported)
    }

    fn window_procedure(&self) -> WindowProcedure {
        procedure
    }

    fn register_class(&self, _class: &ClassDescriptor) -> Result<(), OsError> {
        Err(OsError::new("RegisterClassW", NOT_IMPLEMENTED))
    }

    fn unregister_class(&self, _name: &str, _instance: InstanceHandle) {}

    fn create_window(
        &self,
        _class: &str,
        _info: &WindowCreateInfo,
        _instance: InstanceHandle,
    ) -> Result<RawHandle, OsError> {
        Err(OsError::new("CreateWindowExW", NOT_IMPLEMENTED))
    }

    fn destroy_window(&self, _window: RawHandle) {}

    fn new_message(&self) {}

    fn next_message(&self, _message: &mut ()) -> Fetch {
        Fetch::Quit
    }

    fn dispatch_message(&self, _message: &()) {}
}
