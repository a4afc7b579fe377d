use anyhow::Result;
use log::debug;

use crate::api::AskService;

/// Check that the service is reachable
#[tracing::instrument(skip(service))]
pub async fn health<S: AskService + ?Sized>(service: &S) -> Result<()> {
    debug!("Checking health of {}", service.base_url());

    service.health().await?;
    println!("Service at {} is healthy.", service.base_url());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAskService;
    use crate::http::{ApiError, TransportFailure};

    #[tokio::test]
    async fn test_health_ok() {
        let mut service = MockAskService::new();
        service.expect_health().times(1).returning(|| Ok(()));
        service
            .expect_base_url()
            .return_const("http://localhost:3001".to_string());

        assert!(health(&service).await.is_ok());
    }

    #[tokio::test]
    async fn test_health_unreachable() {
        let mut service = MockAskService::new();
        service.expect_health().times(1).returning(|| {
            Err(ApiError::normalize(
                &TransportFailure::NoResponse {
                    message: "connection refused".into(),
                },
                "http://localhost:3001",
            ))
        });
        service
            .expect_base_url()
            .return_const("http://localhost:3001".to_string());

        let err = health(&service).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ApiError>().unwrap().message,
            "Network error"
        );
    }
}
