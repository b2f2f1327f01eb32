/// Mutation gate for the posts API
///
/// Every write checks its preconditions up front, with the viewer passed
/// in explicitly:
///
/// ```rust,ignore
/// use crate::common::auth::authorize;
///
/// let viewer = authorize(viewer, &[("id", id)])?;
/// store.like(post_id, viewer).await?;
/// ```
///
/// Nothing touches storage until `authorize` has returned `Ok`.

mod errors;
mod guard;

pub use errors::GuardError;
pub use guard::authorize;
