#![cfg(not(target_os = "windows"))]

use wndbridge::{
    Driver, Environment, Error, EventDispatcher, NativePlatform, Platform, WindowCreateInfo,
};

#[test]
fn native_platform_reports_itself_unsupported() {
    assert!(!NativePlatform::default().is_supported());

    let driver = Driver::native(EventDispatcher::new());
    assert!(!driver.supports());
    assert!(!driver.is_running());
}

#[test]
fn native_calls_fail() {
    let mut driver = Driver::native(EventDispatcher::new());

    let err = driver.create(&WindowCreateInfo::default()).unwrap_err();
    assert!(matches!(err, Error::Unsupported));
    assert!(matches!(driver.run(), Err(Error::Unsupported)));
    assert!(driver.get().is_none());

    assert!(matches!(
        Environment::native(EventDispatcher::new()),
        Err(Error::Unsupported)
    ));
}
