use std::fmt;

use crate::environment::Parts;
use crate::{
    Dispatcher, Environment, Error, EventDispatcher, NativePlatform, Platform, WindowCreateInfo,
    WindowId,
};

/// A lazy facade over an [`Environment`].
///
/// No native resource is acquired until the first window is created or the loop is run. When
/// that fails, the driver keeps its dispatcher and the next call tries again.
pub struct Driver<P: Platform = NativePlatform, D: Dispatcher = EventDispatcher> {
    platform: P,
    dispatcher: Option<D>,
    environment: Option<Environment<P, D>>,
}

impl<D: Dispatcher> Driver<NativePlatform, D> {
    /// Creates a new [`Driver`] for the native platform of the current system.
    pub fn native(dispatcher: D) -> Self {
        Self::new(NativePlatform::default(), dispatcher)
    }
}

impl<P: Platform, D: Dispatcher> Driver<P, D> {
    /// Creates a new [`Driver`]. This does not touch the native platform.
    pub fn new(platform: P, dispatcher: D) -> Self {
        Self {
            platform,
            dispatcher: Some(dispatcher),
            environment: None,
        }
    }

    /// Returns whether the platform is able to create windows at all.
    #[inline]
    pub fn supports(&self) -> bool {
        self.platform.is_supported()
    }

    /// Returns the environment, building it first if needed.
    fn environment(&mut self) -> Result<&mut Environment<P, D>, Error> {
        if self.environment.is_none() {
            let parts = Parts::new(self.platform.clone())?;

            // The dispatcher is only moved once nothing can fail anymore.
            let Some(dispatcher) = self.dispatcher.take() else {
                return Err(Error::Unsupported);
            };

            log::debug!("environment ready");
            self.environment = Some(Environment::from_parts(parts, dispatcher));
        }

        match self.environment.as_mut() {
            Some(environment) => Ok(environment),
            None => Err(Error::Unsupported),
        }
    }

    /// Creates a new window. See [`Environment::create`].
    pub fn create(&mut self, info: &WindowCreateInfo) -> Result<WindowId, Error> {
        self.environment()?.create(info)
    }

    /// Runs the message loop. See [`Environment::run`].
    pub fn run(&mut self) -> Result<(), Error> {
        self.environment()?.run()
    }

    /// Asks the message loop to stop. Does nothing if the environment was never built.
    pub fn stop(&mut self) {
        if let Some(environment) = self.environment.as_mut() {
            environment.stop();
        }
    }

    /// Returns whether the message loop is running.
    pub fn is_running(&self) -> bool {
        self.environment
            .as_ref()
            .map_or(false, Environment::is_running)
    }

    /// The environment, if it was built already.
    #[inline]
    pub fn get(&self) -> Option<&Environment<P, D>> {
        self.environment.as_ref()
    }

    /// The environment, if it was built already.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut Environment<P, D>> {
        self.environment.as_mut()
    }
}

impl<P: Platform, D: Dispatcher> fmt::Debug for Driver<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("supported", &self.supports())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{recorder, Call, MockPlatform};
    use crate::{AppEvent, Event, WM_CLOSE};

    #[test]
    fn nothing_is_acquired_up_front() {
        let platform = MockPlatform::new();
        let (_, dispatcher) = recorder();

        let mut driver = Driver::new(platform.clone(), dispatcher);

        assert!(driver.supports());
        assert!(!driver.is_running());
        driver.stop();
        assert!(driver.get().is_none());
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn environment_is_built_once() {
        let platform = MockPlatform::new();
        let (_, dispatcher) = recorder();
        let mut driver = Driver::new(platform.clone(), dispatcher);

        let first = driver.create(&WindowCreateInfo::default()).unwrap();
        let second = driver.create(&WindowCreateInfo::default()).unwrap();

        assert_ne!(first, second);
        assert_eq!(platform.count(&Call::InitializeApartment), 1);
        assert_eq!(driver.get().unwrap().windows().count(), 2);
    }

    #[test]
    fn failed_build_can_be_retried() {
        let platform = MockPlatform::new();
        platform.fail_apartment(true);
        let (events, dispatcher) = recorder();
        let mut driver = Driver::new(platform.clone(), dispatcher);

        assert!(driver.create(&WindowCreateInfo::default()).is_err());
        assert!(driver.get().is_none());

        platform.fail_apartment(false);
        let id = driver.create(&WindowCreateInfo::default()).unwrap();
        let hwnd = driver.get().unwrap().window(id).unwrap().handle();

        platform.push_message(hwnd, WM_CLOSE, 0, 0);
        driver.run().unwrap();

        assert!(!driver.is_running());
        assert_eq!(events.borrow().first(), Some(&Event::App(AppEvent::Starting)));
        assert_eq!(events.borrow().last(), Some(&Event::App(AppEvent::Stopped)));
    }
}
