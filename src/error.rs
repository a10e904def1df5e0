use std::fmt;

use crate::imp;

/// An error that might occur when interacting with the windowing system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A native structure could not be built.
    #[error("could not create window class structure: {0}")]
    StructureAllocation(&'static str),

    /// The operating system refused to register a window class or to create a window.
    #[error("{reason}: {source}")]
    WindowNotCreatable {
        /// What was being attempted.
        reason: &'static str,
        /// The underlying native failure.
        #[source]
        source: OsError,
    },

    /// Any other native call failed.
    #[error(transparent)]
    Os(#[from] OsError),

    /// A handle identity was registered twice without being released in between.
    #[error("handle {0} is already registered")]
    HandleAlreadyRegistered(String),

    /// The native windowing system is not available on this platform.
    #[error("the native windowing system is not supported on this platform")]
    Unsupported,
}

/// A failed call into the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsError {
    /// The name of the native function that failed.
    pub function: &'static str,
    /// The raw error code (`GetLastError` value or `HRESULT` bits).
    pub code: u32,
}

impl OsError {
    /// Creates a new [`OsError`].
    #[inline]
    pub const fn new(function: &'static str, code: u32) -> Self {
        Self { function, code }
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed (error {:#010x})", self.function, self.code)?;

        match imp::describe(self.code) {
            Some(message) => write!(f, ": {}", message.trim_end()),
            None => Ok(()),
        }
    }
}

impl std::error::Error for OsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_allocation_display() {
        let err = Error::StructureAllocation("default cursor unavailable");
        assert_eq!(
            err.to_string(),
            "could not create window class structure: default cursor unavailable"
        );
    }

    #[test]
    fn window_not_creatable_keeps_source() {
        use std::error::Error as _;

        let err = Error::WindowNotCreatable {
            reason: "could not initialize window class",
            source: OsError::new("RegisterClassW", 1410),
        };

        assert!(err
            .to_string()
            .starts_with("could not initialize window class: RegisterClassW failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn os_error_converts() {
        let err: Error = OsError::new("GetModuleHandleW", 5).into();
        assert!(matches!(err, Error::Os(OsError { code: 5, .. })));
        assert!(err.to_string().contains("0x00000005"));
    }
}
