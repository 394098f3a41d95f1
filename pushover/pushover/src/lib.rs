#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! Blocking Pushover API client with regular, emergency and group messages,
//! file attachments and sound listing.
//!
//! ```no_run
//! use pushover_client::{Message, Pushover};
//!
//! let pushover = Pushover::new("user", "token");
//! let response = pushover.send_message(&Message::new("Hello, World!"))?;
//! println!("{response:?}");
//! # Ok::<(), pushover_client::NotificationError>(())
//! ```

use std::time::Duration;

use derivative::Derivative;
use log::{debug, warn};
use multipart::client::lazy::Multipart;

pub use error::{Cause, NotificationError, Operation};
pub use message::{EmergencyMessage, Message, Priority};
pub use response::Response;

use attachment::Attachment;
use message::Fields;

mod attachment;
mod error;
mod message;
mod response;

/// Version of this crate, `unknown` when built without Cargo metadata.
pub const VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
    Some(v) => v,
    None => "unknown",
};

/// Default timeout in seconds applied to every request.
pub const DEFAULT_TIMEOUT: u64 = 10;

const DEFAULT_BASE_URL: &str = "https://api.pushover.net";
const MESSAGES_PATH: &str = "/1/messages.json";
const SOUNDS_PATH: &str = "/1/sounds.json";

/// Pushover client holding the user key, the application API token and a timeout.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Pushover {
    user_key: String,
    #[derivative(Debug = "ignore")]
    api_token: String,
    timeout: Duration,
    base_url: String,
    #[derivative(Debug = "ignore")]
    agent: ureq::Agent,
}

/// Builder of [`Pushover`], for a non-default timeout or base URL.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PushoverBuilder {
    user_key: String,
    #[derivative(Debug = "ignore")]
    api_token: String,
    timeout: Duration,
    base_url: String,
}

impl PushoverBuilder {
    /// Timeout of every request, connecting included. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scheme and host requests are sent to. Defaults to `https://api.pushover.net`.
    pub fn base_url<T>(mut self, base_url: T) -> Self
    where
        T: Into<String>,
    {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates a [`Pushover`].
    pub fn build(self) -> Pushover {
        let agent = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(&format!("pushover-client/{VERSION}"))
            .build();
        Pushover {
            user_key: self.user_key,
            api_token: self.api_token,
            timeout: self.timeout,
            base_url: self.base_url,
            agent,
        }
    }
}

impl Pushover {
    /// Creates a [`Pushover`] with the default timeout of 10 seconds.
    ///
    /// Key formats are not checked locally, Pushover validates them on every request.
    pub fn new<T>(user_key: T, api_token: T) -> Self
    where
        T: Into<String>,
    {
        Self::builder(user_key, api_token).build()
    }

    /// Creates a [`Pushover`] with a timeout in seconds.
    pub fn with_timeout<T>(user_key: T, api_token: T, timeout: u64) -> Self
    where
        T: Into<String>,
    {
        Self::builder(user_key, api_token)
            .timeout(Duration::from_secs(timeout))
            .build()
    }

    /// Creates a [`PushoverBuilder`].
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use pushover_client::Pushover;
    /// let pushover = Pushover::builder("user", "token")
    ///     .timeout(Duration::from_secs(3))
    ///     .build();
    /// assert_eq!(Duration::from_secs(3), pushover.timeout());
    /// ```
    pub fn builder<T>(user_key: T, api_token: T) -> PushoverBuilder
    where
        T: Into<String>,
    {
        PushoverBuilder {
            user_key: user_key.into(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// User key messages are sent to, except group messages.
    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Timeout of every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a message to the user key of this client. <https://pushover.net/api#messages>
    ///
    /// With [`Message::attachment`] set, the file is streamed in a multipart request
    /// and closed before returning.
    pub fn send_message(&self, message: &Message<'_>) -> Result<Response, NotificationError> {
        self.post_message(message, &self.user_key)
            .map_err(|cause| failed(Operation::SendMessage, cause))
    }

    /// Sends a message with emergency priority, retried until acknowledged or expired.
    /// <https://pushover.net/api#priority>
    pub fn send_emergency_message(
        &self,
        message: &EmergencyMessage<'_>,
    ) -> Result<Response, NotificationError> {
        let fields = message.fields(&self.api_token, &self.user_key);
        self.post_form(&fields)
            .map_err(|cause| failed(Operation::SendEmergencyMessage, cause))
    }

    /// Sends a message to `group_key` instead of the user key of this client.
    /// <https://pushover.net/api/groups>
    pub fn send_group_message(
        &self,
        group_key: &str,
        message: &Message<'_>,
    ) -> Result<Response, NotificationError> {
        self.post_message(message, group_key)
            .map_err(|cause| failed(Operation::SendGroupMessage, cause))
    }

    /// Lists sounds available to the application. <https://pushover.net/api#sounds>
    pub fn list_sounds(&self) -> Result<Response, NotificationError> {
        let uri = self.endpoint(SOUNDS_PATH);
        debug!("GET {uri}");
        self.agent
            .get(&uri)
            .query("token", &self.api_token)
            .call()
            .map_err(Cause::from)
            .and_then(parse_response)
            .map_err(|cause| failed(Operation::ListSounds, cause))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn post_message(&self, message: &Message<'_>, user: &str) -> Result<Response, Cause> {
        let fields = message.fields(&self.api_token, user)?;
        match message.attachment {
            Some(path) => {
                let attachment =
                    Attachment::from_path(path).map_err(|source| Cause::Attachment {
                        path: path.to_path_buf(),
                        source,
                    })?;
                self.post_multipart(&fields, attachment)
            }
            None => self.post_form(&fields),
        }
    }

    fn post_form(&self, fields: &Fields<'_>) -> Result<Response, Cause> {
        let uri = self.endpoint(MESSAGES_PATH);
        debug!("POST {uri} with {} fields", fields.len());
        let pairs: Vec<(&str, &str)> = fields.iter().map(|(n, v)| (*n, v.as_ref())).collect();
        let response = self.agent.post(&uri).send_form(&pairs)?;
        parse_response(response)
    }

    // The attachment is moved into the body, so the file closes on every return path
    fn post_multipart(&self, fields: &Fields<'_>, attachment: Attachment) -> Result<Response, Cause> {
        let mut form = Multipart::new();
        for (name, value) in fields {
            form.add_text(*name, value.as_ref());
        }

        let Attachment {
            filename,
            mime,
            stream,
        } = attachment;
        form.add_stream("attachment", stream, Some(filename), Some(mime));

        let form = form.prepare().map_err(|e| Cause::Multipart(e.error))?;
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());

        let uri = self.endpoint(MESSAGES_PATH);
        debug!("POST {uri} with {} fields and attachment", fields.len());
        let response = self
            .agent
            .post(&uri)
            .set("Content-Type", &content_type)
            .send(form)?;
        parse_response(response)
    }
}

// ureq only rejects 4xx and 5xx, an unfollowed 3xx still lands here
fn parse_response(response: ureq::Response) -> Result<Response, Cause> {
    if !(200..300).contains(&response.status()) {
        return Err(Cause::from_status(response));
    }
    Ok(serde_json::from_reader(response.into_reader())?)
}

fn failed(operation: Operation, cause: Cause) -> NotificationError {
    let e = NotificationError::new(operation, cause);
    warn!("{e}");
    e
}
