use shardline_api::v1::{Empty, account::DescribeLimitsResponse};

use super::error::ServiceError;
use crate::backend::Backend;

pub fn describe_limits(
    backend: &Backend,
    _: Empty,
) -> Result<DescribeLimitsResponse, ServiceError> {
    Ok(backend.describe_limits().into())
}
