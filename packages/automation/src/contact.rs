//! Contact profile lookup driven through a device session.

use std::time::{Duration, Instant};

use actors::{ExecutionError, Executor};
use lookup_core::{ContactFields, Job, JobResult, ResultStatus, ServiceConfig};

use crate::driver::{Driver, DriverError, ElementId, SessionGuard};
use crate::webdriver::{WebDriverSession, android_capabilities};

/// Detail for lookups that found at least one profile field.
pub const ANY_INFO: &str = "Ok with any info";

/// Detail for lookups that found nothing.
pub const NO_INFO: &str = "Target is not sharing any info";

/// Resource ids of the screens visited during a lookup.
pub mod ids {
    pub const CONVERSATION_CONTACT_NAME: &str = "com.whatsapp:id/conversation_contact_name";
    pub const CONTACT_TITLE: &str = "com.whatsapp:id/contact_title";
    pub const CONTACT_SUBTITLE: &str = "com.whatsapp:id/contact_subtitle";
    pub const STATUS: &str = "com.whatsapp:id/status";
    pub const STATUS_INFO: &str = "com.whatsapp:id/status_info";
    pub const PROFILE_PICTURE: &str = "com.whatsapp:id/profile_picture_image";
    pub const PICTURE_ANIMATION: &str = "com.whatsapp:id/picture_animation";
}

/// Deep link that opens a chat with `target`.
///
/// The target is form-encoded, so it can be embedded in a quoted shell
/// argument.
pub fn chat_link(target: &str) -> String {
    let phone: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("https://api.whatsapp.com/send?phone={phone}")
}

/// Map extracted fields to a job result.
pub fn contact_result(fields: ContactFields) -> JobResult {
    if fields.has_any() {
        JobResult::ok(ANY_INFO, fields)
    } else {
        JobResult::new(ResultStatus::Error, NO_INFO, fields)
    }
}

/// Polling policy for element lookups.
#[derive(Debug, Clone, Copy)]
pub struct StepWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl StepWait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(250),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wait until `resource_id` is present. Errors count as "not present".
    fn presence<D: Driver + ?Sized>(&self, driver: &mut D, resource_id: &str) -> Option<ElementId> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match driver.find_by_id(resource_id) {
                Ok(Some(element)) => return Some(element),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(resource_id, error = %e, "Element lookup failed");
                    return None;
                }
            }
            if Instant::now() >= deadline {
                tracing::debug!(resource_id, "Timed out waiting for element");
                return None;
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn text<D: Driver + ?Sized>(&self, driver: &mut D, resource_id: &str) -> String {
        let Some(element) = self.presence(driver, resource_id) else {
            return String::new();
        };
        driver.element_text(&element).unwrap_or_else(|e| {
            tracing::debug!(resource_id, error = %e, "Could not read element text");
            String::new()
        })
    }

    fn click<D: Driver + ?Sized>(&self, driver: &mut D, resource_id: &str) {
        if let Some(element) = self.presence(driver, resource_id)
            && let Err(e) = driver.click(&element)
        {
            tracing::debug!(resource_id, error = %e, "Could not click element");
        }
    }

    fn picture<D: Driver + ?Sized>(&self, driver: &mut D) -> String {
        let Some(element) = self.presence(driver, ids::PICTURE_ANIMATION) else {
            tracing::error!("Profile picture not found");
            return String::new();
        };
        driver.element_screenshot(&element).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Could not capture profile picture");
            String::new()
        })
    }
}

/// Walk the contact screens for `target` and collect its profile fields.
///
/// Only a failure to open the chat is an error; missing elements leave the
/// matching field empty.
pub fn lookup_contact<D: Driver + ?Sized>(
    driver: &mut D,
    target: &str,
    wait: &StepWait,
) -> Result<ContactFields, DriverError> {
    tracing::debug!("Opening new chat");
    driver.open_url(&chat_link(target))?;

    tracing::debug!("Looking for contact name");
    wait.click(driver, ids::CONVERSATION_CONTACT_NAME);

    let mut fields = ContactFields {
        title: wait.text(driver, ids::CONTACT_TITLE),
        subtitle: wait.text(driver, ids::CONTACT_SUBTITLE),
        status: wait.text(driver, ids::STATUS),
        status_info: wait.text(driver, ids::STATUS_INFO),
        ..Default::default()
    };

    tracing::debug!("Looking for contact image");
    wait.click(driver, ids::PROFILE_PICTURE);
    fields.image = wait.picture(driver);

    Ok(fields)
}

/// Executor that looks contacts up on a device behind a WebDriver endpoint.
///
/// Each execution opens its own session and closes it before returning.
#[derive(Debug, Clone)]
pub struct ContactLookup {
    engine_url: String,
    wait: StepWait,
}

impl ContactLookup {
    pub fn new(engine_url: impl Into<String>, step_timeout: Duration) -> Self {
        Self {
            engine_url: engine_url.into(),
            wait: StepWait::new(step_timeout),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.engine_url.clone(), config.step_timeout)
    }

    pub fn engine_url(&self) -> &str {
        &self.engine_url
    }
}

impl Executor for ContactLookup {
    fn execute(&self, job: &Job) -> Result<(), ExecutionError> {
        let session = WebDriverSession::connect(&self.engine_url, android_capabilities())
            .map_err(|e| ExecutionError::Session(e.to_string()))?;
        let mut session = SessionGuard::new(session);

        let fields = lookup_contact(&mut *session, job.target(), &self.wait)?;
        job.answer(contact_result(fields));
        Ok(())
    }
}
