// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod secret;
mod site_url;

pub use id::{ComponentId, Id, IdKind, RequestId, VersionId};
pub use secret::Secret;
pub use site_url::{SiteUrl, SiteUrlError};
