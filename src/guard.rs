//! Checks run between loading a resource and acting on it.
//!
//! Handlers load a resource by id, pass the result through [`require_found`]
//! and then, for mutations, through [`require_ownership`]. The not-found check
//! always comes first so a missing resource is reported as such rather than as
//! an ownership failure.

use uuid::Uuid;

/// A stored resource with a single owner.
pub trait Owned {
	fn id(&self) -> Uuid;
	fn owner(&self) -> Uuid;
}

/// Route errors that can represent the two guard failures.
pub trait GuardError {
	fn not_found(id: Uuid) -> Self;
	fn not_owner(id: Uuid) -> Self;
}

/// Passes a found resource through, or fails with [`GuardError::not_found`].
pub fn require_found<T, E: GuardError>(id: Uuid, resource: Option<T>) -> Result<T, E> {
	resource.ok_or_else(|| E::not_found(id))
}

/// Passes the resource through if `requester` owns it, or fails with
/// [`GuardError::not_owner`].
pub fn require_ownership<T: Owned, E: GuardError>(requester: Uuid, resource: T) -> Result<T, E> {
	if resource.owner() == requester {
		Ok(resource)
	} else {
		tracing::debug!(
			resource = %resource.id(),
			owner = %resource.owner(),
			%requester,
			"ownership check failed"
		);

		Err(E::not_owner(resource.id()))
	}
}
