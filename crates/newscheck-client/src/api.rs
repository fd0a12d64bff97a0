use async_trait::async_trait;
use newscheck_core::{CheckRequest, CheckResponse};

use crate::http::ClientError;

/// Anything that can answer a check request.
///
/// [`CheckClient`](crate::CheckClient) is the production implementation;
/// sessions are generic over this so they can run against an in-memory fake.
#[async_trait]
pub trait CheckApi: Send + Sync {
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, ClientError>;
}

#[async_trait]
impl<T: CheckApi + ?Sized> CheckApi for &T {
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, ClientError> {
        (**self).check(request).await
    }
}
