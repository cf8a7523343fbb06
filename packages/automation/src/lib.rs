//! Device automation collaborator for the lookup service.
//!
//! [`ContactLookup`] implements [`actors::Executor`]: for every job it opens
//! a WebDriver session against an Appium endpoint, walks the contact profile
//! screens for the job's target and answers the job with what it found.

pub mod contact;
pub mod driver;
pub mod webdriver;

pub use contact::{ANY_INFO, ContactLookup, NO_INFO, StepWait, chat_link, contact_result, lookup_contact};
pub use driver::{Driver, DriverError, ElementId, SessionGuard};
pub use webdriver::{WebDriverSession, android_capabilities};
