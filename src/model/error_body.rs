use serde::{Deserialize, Serialize};

/// The JSON body the backend sends with a non-2xx response.
///
/// Either field may be absent; the submit endpoint uses `error` and the login
/// endpoint may use either.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parses a response body, tolerating anything that is not the expected JSON.
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }

    pub fn any_message(&self) -> Option<&str> {
        self.error_message()
            .or(self.message.as_deref().filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_message() {
        let body = ErrorBody::parse(br#"{"error":"Invalid batch size","message":"x"}"#);
        assert_eq!(body.any_message(), Some("Invalid batch size"));
    }

    #[test]
    fn message_used_when_error_absent() {
        let body = ErrorBody::parse(br#"{"message":"Wrong password"}"#);
        assert_eq!(body.error_message(), None);
        assert_eq!(body.any_message(), Some("Wrong password"));
    }

    #[test]
    fn garbage_body_has_no_message() {
        assert_eq!(ErrorBody::parse(b"<html>502</html>").any_message(), None);
    }
}
