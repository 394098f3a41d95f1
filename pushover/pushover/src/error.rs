use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::Response;

/// Client operation that produced a [`NotificationError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum Operation {
    /// [`crate::Pushover::send_message`]
    #[strum(to_string = "send message")]
    SendMessage,
    /// [`crate::Pushover::send_emergency_message`]
    #[strum(to_string = "send emergency message")]
    SendEmergencyMessage,
    /// [`crate::Pushover::send_group_message`]
    #[strum(to_string = "send group message")]
    SendGroupMessage,
    /// [`crate::Pushover::list_sounds`]
    #[strum(to_string = "list sounds")]
    ListSounds,
}

/// Underlying reason of a [`NotificationError`].
#[derive(Error, Debug)]
pub enum Cause {
    /// Pushover answered with a status outside 2xx.
    #[error("{reason}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Reason phrase, or `status code <code>` if the server sent none.
        reason: String,
        /// `errors` array of the response body, empty if the body had none.
        errors: Vec<String>,
    },
    /// Request never completed e.g. DNS, connection, TLS or timeout failure.
    #[error("{0}")]
    Transport(Box<ureq::Transport>),
    /// Attachment could not be opened or read.
    #[error("attachment {}: {source}", path.display())]
    Attachment {
        /// Path given by the caller.
        path: PathBuf,
        /// IO error from opening or sniffing the file.
        source: io::Error,
    },
    /// Multipart body could not be prepared.
    #[error("multipart body: {0}")]
    Multipart(#[source] io::Error),
    /// 2xx response body is not a JSON object.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    /// HTML and monospace are mutually exclusive. <https://pushover.net/api#html>
    #[error("html and monospace are mutually exclusive")]
    HtmlMonospace,
}

impl From<ureq::Error> for Cause {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(_, response) => Cause::from_status(response),
            ureq::Error::Transport(t) => Cause::Transport(Box::new(t)),
        }
    }
}

impl Cause {
    /// Any response outside 2xx.
    pub(crate) fn from_status(response: ureq::Response) -> Self {
        let code = response.status();
        let reason = match response.status_text() {
            "" => format!("status code {code}"),
            text => text.to_string(),
        };
        // Pushover explains 4xx responses in an `errors` array
        let errors: Vec<String> = serde_json::from_reader::<_, Response>(response.into_reader())
            .map(|body| body.errors().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        Cause::Status {
            code,
            reason,
            errors,
        }
    }
}

/// Notification error, rendered as `Failed to <operation>: <cause>`.
#[derive(Error, Debug)]
#[error("Failed to {operation}: {cause}")]
pub struct NotificationError {
    operation: Operation,
    #[source]
    cause: Cause,
}

impl NotificationError {
    pub(crate) fn new(operation: Operation, cause: Cause) -> Self {
        Self { operation, cause }
    }

    /// Operation which failed.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Underlying reason.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// HTTP status code when Pushover rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            Cause::Status { code, .. } => Some(code),
            _ => None,
        }
    }

    /// `errors` reported by Pushover when it rejected the request.
    pub fn errors(&self) -> &[String] {
        match &self.cause {
            Cause::Status { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_display() {
        let e = NotificationError::new(
            Operation::SendMessage,
            Cause::Status {
                code: 400,
                reason: "Bad Request".to_string(),
                errors: vec![],
            },
        );
        assert_eq!("Failed to send message: Bad Request", e.to_string());
        assert_eq!(Some(400), e.status());

        let e = NotificationError::new(Operation::SendEmergencyMessage, Cause::HtmlMonospace);
        assert_eq!(
            "Failed to send emergency message: html and monospace are mutually exclusive",
            e.to_string()
        );
        assert_eq!(None, e.status());
        assert!(e.errors().is_empty());
    }

    #[test]
    fn t_operation() {
        assert_eq!("send message", Operation::SendMessage.to_string());
        assert_eq!(
            "send emergency message",
            Operation::SendEmergencyMessage.to_string()
        );
        assert_eq!("send group message", Operation::SendGroupMessage.to_string());
        assert_eq!("list sounds", Operation::ListSounds.to_string());
    }

    #[test]
    fn t_multipart_display() {
        let e = NotificationError::new(
            Operation::SendMessage,
            Cause::Multipart(io::Error::new(io::ErrorKind::Other, "broken pipe")),
        );
        assert_eq!(
            "Failed to send message: multipart body: broken pipe",
            e.to_string()
        );
    }

    #[test]
    fn t_attachment_display() {
        let e = NotificationError::new(
            Operation::SendGroupMessage,
            Cause::Attachment {
                path: PathBuf::from("path/to/file"),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            },
        );
        assert_eq!(
            "Failed to send group message: attachment path/to/file: not found",
            e.to_string()
        );
    }
}
