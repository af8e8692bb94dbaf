use crate::error::AppError;
use uuid::Uuid;

/// Allows the operation when the caller is the owner of the requested
/// resource scope, denying with `Forbidden` otherwise.
///
/// This is the single choke point for per-user data isolation: every
/// resource-scoped handler calls it before touching storage. The comparison is
/// exact identifier equality; there is no admin or internal-caller bypass.
pub fn authorize(caller_id: Uuid, requested_owner_id: Uuid) -> Result<Uuid, AppError> {
    if caller_id == requested_owner_id {
        Ok(requested_owner_id)
    } else {
        Err(AppError::Forbidden)
    }
}
