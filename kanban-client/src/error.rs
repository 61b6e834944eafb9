/// Client error types

use kanban_shared::validation::FieldViolation;

/// Errors returned by [`crate::api::BoardApi`] and [`crate::store::BoardStore`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or undecodable response
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        /// Field violations, present on validation errors
        details: Vec<FieldViolation>,
    },

    /// The operation needs an active board and none is selected
    #[error("No board selected")]
    NoBoardSelected,
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            ClientError::NoBoardSelected => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Validation error".to_string(),
            details: vec![FieldViolation::new("name", "Board name is required")],
        };
        assert_eq!(err.to_string(), "Validation error");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_no_board_selected() {
        assert_eq!(ClientError::NoBoardSelected.to_string(), "No board selected");
        assert_eq!(ClientError::NoBoardSelected.status(), None);
    }
}
