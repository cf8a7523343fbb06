//! Device driver abstraction used by the lookup steps.

use std::ops::{Deref, DerefMut};

/// Opaque reference to a UI element inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

/// Errors raised while talking to the automation engine.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webdriver error '{error}': {message}")]
    Protocol { error: String, message: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl DriverError {
    /// Whether the engine reported that an element does not exist.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, DriverError::Protocol { error, .. } if error == "no such element")
    }
}

impl From<DriverError> for actors::ExecutionError {
    fn from(e: DriverError) -> Self {
        actors::ExecutionError::Failed(e.to_string())
    }
}

/// Blocking operations the contact lookup needs from a device session.
pub trait Driver {
    /// Open `url` on the device through the Android activity manager.
    fn open_url(&mut self, url: &str) -> Result<(), DriverError>;

    /// Look up an element by resource id once, without waiting.
    fn find_by_id(&mut self, resource_id: &str) -> Result<Option<ElementId>, DriverError>;

    fn element_text(&mut self, element: &ElementId) -> Result<String, DriverError>;

    fn click(&mut self, element: &ElementId) -> Result<(), DriverError>;

    /// Base64-encoded PNG of the element's on-screen area.
    fn element_screenshot(&mut self, element: &ElementId) -> Result<String, DriverError>;

    /// End the session on the engine.
    fn quit(&mut self) -> Result<(), DriverError>;
}

/// Owns a driver session and ends it when dropped.
///
/// Teardown failures are logged and never propagated.
pub struct SessionGuard<D: Driver> {
    driver: D,
}

impl<D: Driver> SessionGuard<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }
}

impl<D: Driver> Deref for SessionGuard<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.driver
    }
}

impl<D: Driver> DerefMut for SessionGuard<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: Driver> Drop for SessionGuard<D> {
    fn drop(&mut self) {
        if let Err(e) = self.driver.quit() {
            tracing::debug!(error = %e, "Ignoring session teardown failure");
        }
    }
}
