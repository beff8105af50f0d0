//! Profile of the user currently logged in.

use serde::{Deserialize, Serialize};

/// The profile of the user currently logged in to the host.
///
/// Propagated to modules through a `Watchable<Profile>` on the
/// [`ModuleApi`](crate::ModuleApi) handle; the derived `PartialEq` lets the
/// container suppress assignments that do not actually change anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user ID of the logged-in user. `None` means no user is logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The display name of the logged-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the user is a guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest: Option<bool>,
}
