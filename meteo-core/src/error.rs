/// Device location failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("User denied Geolocation")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Timeout expired")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Every way a query can end without a render. `Display` is the text shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Error: {0}")]
    Network(String),
    #[error("City not found. Try another name.")]
    NotFound,
    #[error("Error: No data available")]
    NoData,
    #[error("Could not get location: {0}")]
    Geolocation(#[from] GeolocationError),
    #[error("Geolocation not supported.")]
    GeolocationUnsupported,
}

impl QueryError {
    /// Wrap a provider failure. Only the outermost context is kept, which is
    /// the message the provider attached for the user.
    pub fn network(err: &anyhow::Error) -> Self {
        QueryError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(QueryError::NotFound.to_string(), "City not found. Try another name.");
        assert_eq!(QueryError::NoData.to_string(), "Error: No data available");
        assert_eq!(QueryError::GeolocationUnsupported.to_string(), "Geolocation not supported.");
        assert_eq!(
            QueryError::from(GeolocationError::Timeout).to_string(),
            "Could not get location: Timeout expired"
        );
    }

    #[test]
    fn network_keeps_outer_context_only() {
        let err = anyhow::anyhow!("connection reset").context("Geocoding failed");
        assert_eq!(QueryError::network(&err).to_string(), "Error: Geocoding failed");
    }
}
