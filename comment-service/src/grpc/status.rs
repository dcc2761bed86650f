use tonic::Status;
use tracing::error;

use crate::domain::error::DomainError;

pub(crate) fn map_domain_error(err: DomainError) -> Status {
    match err {
        DomainError::Validation { .. } | DomainError::UnknownColumn(_) => {
            Status::invalid_argument(err.to_string())
        }
        DomainError::NotFound(_) => Status::not_found(err.to_string()),
        DomainError::Unexpected(_) => {
            error!(%err, "storage failure");
            Status::internal("internal error")
        }
    }
}
