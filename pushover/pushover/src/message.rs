use std::borrow::Cow;
use std::path::Path;

use maplit::{hashmap, hashset};

use crate::error::Cause;

pub(crate) type Fields<'a> = Vec<(&'static str, Cow<'a, str>)>;

/// Messages may be sent with a different priority
/// that affects how the message is presented to the user. <https://pushover.net/api#priority>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum Priority {
    /// Normal (default)
    #[default]
    #[strum(to_string = "0", serialize = "normal")]
    Normal,
    /// Lowest
    #[strum(to_string = "-2", serialize = "lowest")]
    Lowest,
    /// Low
    #[strum(to_string = "-1", serialize = "low")]
    Low,
    /// High
    #[strum(to_string = "1", serialize = "high")]
    High,
    /// Emergency, requires `retry` and `expire`. Prefer [`crate::Pushover::send_emergency_message`].
    #[strum(to_string = "2", serialize = "emergency")]
    Emergency,
}

/// Parameters of a regular or group message. <https://pushover.net/api#messages>
///
/// Unset optional parameters are left out of the request.
#[derive(Clone, Debug, Default)]
pub struct Message<'a> {
    message: Cow<'a, str>,
    /// Your message's title, otherwise your app's name is used.
    pub title: Option<&'a str>,
    /// A supplementary URL to show with your message. <https://pushover.net/api#urls>
    pub url: Option<&'a str>,
    /// A title for your supplementary URL, otherwise just the URL is shown.
    pub url_title: Option<&'a str>,
    /// Defaults to [`Priority::Normal`].
    pub priority: Priority,
    /// Name of a sound returned by [`crate::Pushover::list_sounds`]. <https://pushover.net/api#sounds>
    pub sound: Option<&'a str>,
    /// Your user's device name to send the message directly to that device,
    /// rather than all of the user's devices (multiple devices may be separated by a comma).
    pub device: Option<&'a str>,
    /// To enable HTML formatting. <https://pushover.net/api#html>
    pub html: bool,
    /// To enable monospace messages. <https://pushover.net/api#html>
    pub monospace: bool,
    /// Unix timestamp displayed instead of the time Pushover received the message.
    pub timestamp: Option<u64>,
    /// Path of a local file sent as `attachment`. <https://pushover.net/api#attachments>
    pub attachment: Option<&'a Path>,
}

/// Parameters of an emergency-priority message. <https://pushover.net/api#priority>
#[derive(Clone, Debug)]
pub struct EmergencyMessage<'a> {
    message: Cow<'a, str>,
    /// Your message's title, otherwise your app's name is used.
    pub title: Option<&'a str>,
    /// A supplementary URL to show with your message.
    pub url: Option<&'a str>,
    /// A title for your supplementary URL, otherwise just the URL is shown.
    pub url_title: Option<&'a str>,
    /// How often in seconds the user is notified again until acknowledged. Defaults to 30.
    pub retry: u32,
    /// How many seconds the notification keeps being retried. Defaults to 3600.
    pub expire: u32,
    /// Name of a sound returned by [`crate::Pushover::list_sounds`].
    pub sound: Option<&'a str>,
    /// Device name, rather than all of the user's devices.
    pub device: Option<&'a str>,
}

/// Keeps the HTML subset Pushover renders. <https://pushover.net/api#html>
pub(crate) fn sanitize_message<'a, T>(message: T) -> Cow<'a, str>
where
    T: Into<Cow<'a, str>>,
{
    let tags = hashset!["b", "i", "u", "font", "a"];
    let tag_attrs = hashmap![
        "a" => hashset!["href"],
        "font" => hashset!["color"],
    ];
    let message = message.into();
    // Builder consumes tags and tag_attrs unless maintainer changes method signatures
    ammonia::Builder::default()
        .tags(tags)
        .tag_attributes(tag_attrs)
        .clean(message.as_ref())
        .to_string()
        .into()
}

fn add_optional<'a, T>(fields: &mut Fields<'a>, name: &'static str, value: Option<T>)
where
    T: Into<Cow<'a, str>>,
{
    if let Some(v) = value {
        fields.push((name, v.into()));
    }
}

impl<'a> Message<'a> {
    /// Creates a [`Message`] with default parameters.
    ///
    /// ```rust
    /// # use pushover_client::{Message, Priority};
    /// let mut m = Message::new("hi");
    /// m.title = Some("greeting");
    /// m.priority = Priority::High;
    /// ```
    pub fn new<T>(message: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn fields<'f>(&'f self, token: &'f str, user: &'f str) -> Result<Fields<'f>, Cause> {
        // HTML and monospace are mutually exclusive <https://pushover.net/api#html>
        if self.html && self.monospace {
            return Err(Cause::HtmlMonospace);
        }

        let message = if self.html {
            sanitize_message(self.message.as_ref())
        } else {
            Cow::Borrowed(self.message.as_ref())
        };

        let mut fields: Fields<'f> = vec![
            ("token", token.into()),
            ("user", user.into()), // User or group key
            ("message", message),
            ("priority", self.priority.to_string().into()),
        ];
        add_optional(&mut fields, "title", self.title);
        add_optional(&mut fields, "url", self.url);
        add_optional(&mut fields, "url_title", self.url_title);
        add_optional(&mut fields, "sound", self.sound);
        add_optional(&mut fields, "device", self.device);
        add_optional(&mut fields, "html", self.html.then_some("1"));
        add_optional(&mut fields, "monospace", self.monospace.then_some("1"));
        add_optional(&mut fields, "timestamp", self.timestamp.map(|t| t.to_string()));
        Ok(fields)
    }
}

impl Default for EmergencyMessage<'_> {
    fn default() -> Self {
        Self {
            message: Cow::Borrowed(""),
            title: None,
            url: None,
            url_title: None,
            retry: 30,
            expire: 3600,
            sound: None,
            device: None,
        }
    }
}

impl<'a> EmergencyMessage<'a> {
    /// Creates an [`EmergencyMessage`] retried every 30 seconds for an hour.
    pub fn new<T>(message: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn fields<'f>(&'f self, token: &'f str, user: &'f str) -> Fields<'f> {
        let mut fields: Fields<'f> = vec![
            ("token", token.into()),
            ("user", user.into()),
            ("message", self.message.as_ref().into()),
            ("priority", Priority::Emergency.to_string().into()),
            ("retry", self.retry.to_string().into()),
            ("expire", self.expire.to_string().into()),
        ];
        add_optional(&mut fields, "title", self.title);
        add_optional(&mut fields, "url", self.url);
        add_optional(&mut fields, "url_title", self.url_title);
        add_optional(&mut fields, "sound", self.sound);
        add_optional(&mut fields, "device", self.device);
        fields
    }
}
