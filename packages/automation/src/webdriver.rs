//! Minimal blocking W3C WebDriver client for an Appium endpoint.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::driver::{Driver, DriverError, ElementId};

/// Upper bound for a single HTTP round trip; session creation on a device
/// can take tens of seconds.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Element reference, keyed by the W3C element identifier.
#[derive(Debug, Deserialize)]
struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

/// Capabilities for an UiAutomator2 session on an Android emulator.
pub fn android_capabilities() -> Value {
    json!({
        "platformName": "Android",
        "appium:automationName": "UiAutomator2",
        "appium:deviceName": "Android Emulator",
    })
}

/// Decode a WebDriver response body, turning error payloads into
/// [`DriverError::Protocol`].
fn parse_envelope<T: DeserializeOwned>(success: bool, body: Value) -> Result<T, DriverError> {
    if !success {
        return match serde_json::from_value::<Envelope<ErrorValue>>(body.clone()) {
            Ok(Envelope { value }) => Err(DriverError::Protocol {
                error: value.error,
                message: value.message,
            }),
            Err(_) => Err(DriverError::UnexpectedResponse(body.to_string())),
        };
    }

    serde_json::from_value::<Envelope<T>>(body)
        .map(|envelope| envelope.value)
        .map_err(|e| DriverError::UnexpectedResponse(e.to_string()))
}

fn read_value<T: DeserializeOwned>(response: Response) -> Result<T, DriverError> {
    let success = response.status().is_success();
    let body: Value = response.json()?;
    parse_envelope(success, body)
}

/// An open WebDriver session.
pub struct WebDriverSession {
    client: Client,
    base: String,
    session_id: String,
}

impl WebDriverSession {
    /// Open a new session on the engine at `engine_url`.
    pub fn connect(engine_url: &str, capabilities: Value) -> Result<Self, DriverError> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let base = engine_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base}/session"))
            .json(&json!({
                "capabilities": {
                    "alwaysMatch": capabilities,
                    "firstMatch": [{}],
                }
            }))
            .send()?;
        let created: NewSession = read_value(response)?;
        tracing::debug!(session_id = %created.session_id, "Opened automation session");

        Ok(Self {
            client,
            base,
            session_id: created.session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base, self.session_id, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DriverError> {
        read_value(self.client.get(self.url(path)).send()?)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, DriverError> {
        read_value(self.client.post(self.url(path)).json(&body).send()?)
    }
}

impl Driver for WebDriverSession {
    fn open_url(&mut self, url: &str) -> Result<(), DriverError> {
        let _: Value = self.post(
            "/execute/sync",
            json!({
                "script": "mobile: shell",
                "args": [{
                    "command": "am",
                    "args": format!("start -a android.intent.action.VIEW -d \"{url}\""),
                }],
            }),
        )?;
        Ok(())
    }

    fn find_by_id(&mut self, resource_id: &str) -> Result<Option<ElementId>, DriverError> {
        match self.post::<ElementRef>("/element", json!({ "using": "id", "value": resource_id })) {
            Ok(element) => Ok(Some(ElementId(element.id))),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn element_text(&mut self, element: &ElementId) -> Result<String, DriverError> {
        self.get(&format!("/element/{}/text", element.0))
    }

    fn click(&mut self, element: &ElementId) -> Result<(), DriverError> {
        let _: Value = self.post(&format!("/element/{}/click", element.0), json!({}))?;
        Ok(())
    }

    fn element_screenshot(&mut self, element: &ElementId) -> Result<String, DriverError> {
        self.get(&format!("/element/{}/screenshot", element.0))
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        let response = self.client.delete(format!("{}/session/{}", self.base, self.session_id)).send()?;
        let _: Value = read_value(response)?;
        tracing::debug!(session_id = %self.session_id, "Closed automation session");
        Ok(())
    }
}
