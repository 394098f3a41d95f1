use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pushover API response. <https://pushover.net/api#response>
///
/// Decoded JSON body of a successful call, kept verbatim. Accessors read
/// well-known keys without requiring them to be present.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Response(Map<String, Value>);

impl Response {
    /// If the request was valid, `status` is `1`.
    pub fn status(&self) -> Option<i64> {
        self.0.get("status").and_then(Value::as_i64)
    }

    /// Randomly-generated unique token associated with the request.
    pub fn request(&self) -> Option<&str> {
        self.0.get("request").and_then(Value::as_str)
    }

    /// Receipt of an emergency-priority message. <https://pushover.net/api/receipts>
    pub fn receipt(&self) -> Option<&str> {
        self.0.get("receipt").and_then(Value::as_str)
    }

    /// Parameters reported invalid by the API.
    pub fn errors(&self) -> Vec<&str> {
        self.0
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| errors.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Sound identifiers mapped to display names, from [`crate::Pushover::list_sounds`].
    pub fn sounds(&self) -> Option<&Map<String, Value>> {
        self.0.get("sounds").and_then(Value::as_object)
    }

    /// Consumes into the raw JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for Response {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Map<String, Value>> for Response {
    fn from(m: Map<String, Value>) -> Self {
        Self(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_accessors() -> Result<(), serde_json::Error> {
        let res: Response = serde_json::from_str(
            r#"{"status":1,"request":"00000000-0000-0000-0000-000000000000","receipt":"r"}"#,
        )?;
        assert_eq!(Some(1), res.status());
        assert_eq!(Some("00000000-0000-0000-0000-000000000000"), res.request());
        assert_eq!(Some("r"), res.receipt());
        assert!(res.errors().is_empty());
        assert!(res.sounds().is_none());
        Ok(())
    }

    #[test]
    fn t_errors() -> Result<(), serde_json::Error> {
        let res: Response =
            serde_json::from_str(r#"{"status":0,"errors":["user identifier is invalid"]}"#)?;
        assert_eq!(Some(0), res.status());
        assert_eq!(vec!["user identifier is invalid"], res.errors());
        Ok(())
    }

    #[test]
    fn t_sounds() -> Result<(), serde_json::Error> {
        let res: Response =
            serde_json::from_str(r#"{"sounds":{"pushover":"Pushover (default)"},"status":1}"#)?;
        let sounds = res.sounds().expect("sounds");
        assert_eq!(Some("Pushover (default)"), sounds["pushover"].as_str());
        Ok(())
    }

    #[test]
    fn t_verbatim() -> Result<(), serde_json::Error> {
        let body = serde_json::json!({"status": 1, "extra": {"nested": [1, 2]}});
        let res: Response = serde_json::from_value(body.clone())?;
        assert_eq!(body, Value::Object(res.into_inner()));
        Ok(())
    }

    #[test]
    fn t_not_an_object() {
        assert!(serde_json::from_str::<Response>("[1,2]").is_err());
        assert!(serde_json::from_str::<Response>("not json").is_err());
    }
}
