use serde::Serialize;

use crate::error::ClawdError;

/// Body of `POST /rest/v1/rpc/<function>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsPayload {
    pub interaction_count: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl StatsPayload {
    /// Parse the three positional counters of `report-stats`.
    ///
    /// Rejects a wrong argument count, non-integers and negative values.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ClawdError> {
        if args.len() != 3 {
            let msg = if args.len() < 3 {
                "Missing required arguments".to_string()
            } else {
                format!("Expected exactly 3 arguments, got {}", args.len())
            };
            return Err(ClawdError::InvalidArgument(msg));
        }

        let mut values = [0i64; 3];
        for (slot, raw) in values.iter_mut().zip(args) {
            let raw = raw.as_ref().trim();
            *slot = raw.parse::<i64>().map_err(|e| {
                ClawdError::InvalidArgument(format!(
                    "Invalid argument format. All arguments must be integers. ('{}': {})",
                    raw, e
                ))
            })?;
        }

        if values.iter().any(|v| *v < 0) {
            return Err(ClawdError::InvalidArgument(
                "All values must be non-negative integers".to_string(),
            ));
        }

        Ok(Self {
            interaction_count: values[0] as u64,
            input_tokens: values[1] as u64,
            output_tokens: values[2] as u64,
            user_id: None,
        })
    }

    pub fn with_user_id(mut self, user_id: Option<&str>) -> Self {
        self.user_id = user_id.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_three_counters() {
        let payload = StatsPayload::from_args(&["10", "5000", "3000"]).unwrap();
        assert_eq!(payload.interaction_count, 10);
        assert_eq!(payload.input_tokens, 5000);
        assert_eq!(payload.output_tokens, 3000);
        assert_eq!(payload.user_id, None);
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(StatsPayload::from_args(&["0", "0", "0"]).is_ok());
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = StatsPayload::from_args(&["10", "-1", "3000"]).unwrap_err();
        assert_eq!(err.to_string(), "All values must be non-negative integers");
    }

    #[test]
    fn test_rejects_non_integers() {
        for bad in [["ten", "1", "1"], ["1", "1.5", "1"], ["1", "1", ""]] {
            let err = StatsPayload::from_args(&bad).unwrap_err();
            assert!(
                err.to_string().starts_with("Invalid argument format"),
                "unexpected message for {:?}: {}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_rejects_wrong_argument_count() {
        let err = StatsPayload::from_args(&["1", "2"]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required arguments");

        let err = StatsPayload::from_args(&["1", "2", "3", "4"]).unwrap_err();
        assert_eq!(err.to_string(), "Expected exactly 3 arguments, got 4");
    }

    #[test]
    fn test_user_id_omitted_from_body_when_absent() {
        let payload = StatsPayload::from_args(&["1", "2", "3"]).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"interaction_count": 1, "input_tokens": 2, "output_tokens": 3})
        );

        let payload = payload.with_user_id(Some("u1"));
        assert_eq!(serde_json::to_value(&payload).unwrap()["user_id"], "u1");
    }
}
