// Roster → owner → display-name resolution.

use std::collections::HashMap;

use tracing::warn;

/// Resolves league roster ids to manager display names.
///
/// Missing links never fail the analysis: an unknown owner or display name
/// resolves to a sentinel that still names the roster, so two unresolved
/// rosters can never collide.
#[derive(Debug, Clone, Default)]
pub struct ManagerDirectory {
    owners: HashMap<u32, Option<String>>,
    names: HashMap<String, String>,
}

impl ManagerDirectory {
    /// `owners` maps roster id to owner user id (rosters may be orphaned);
    /// `names` maps user id to display name.
    pub fn new(
        owners: impl IntoIterator<Item = (u32, Option<String>)>,
        names: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            owners: owners.into_iter().collect(),
            names: names.into_iter().collect(),
        }
    }

    /// Display name for `roster_id`, or the sentinel on any lookup miss.
    pub fn manager_name(&self, roster_id: u32) -> String {
        let Some(owner) = self.owners.get(&roster_id).and_then(|o| o.as_deref()) else {
            warn!(roster_id, "roster has no owner, using placeholder name");
            return unknown_manager(roster_id);
        };
        match self.names.get(owner) {
            Some(name) => name.clone(),
            None => {
                warn!(roster_id, owner, "owner has no display name, using placeholder name");
                unknown_manager(roster_id)
            }
        }
    }
}

/// Placeholder name for a roster whose manager cannot be resolved.
pub fn unknown_manager(roster_id: u32) -> String {
    format!("N/A (roster {roster_id})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ManagerDirectory {
        ManagerDirectory::new(
            [
                (1, Some("u1".to_string())),
                (2, Some("u2".to_string())),
                (3, None),
                (4, Some("ghost".to_string())),
            ],
            [
                ("u1".to_string(), "alice".to_string()),
                ("u2".to_string(), "bob".to_string()),
            ],
        )
    }

    #[test]
    fn resolves_known_rosters() {
        let dir = directory();
        assert_eq!(dir.manager_name(1), "alice");
        assert_eq!(dir.manager_name(2), "bob");
    }

    #[test]
    fn orphaned_roster_gets_sentinel() {
        assert_eq!(directory().manager_name(3), "N/A (roster 3)");
    }

    #[test]
    fn owner_without_name_gets_sentinel() {
        assert_eq!(directory().manager_name(4), "N/A (roster 4)");
    }

    #[test]
    fn unknown_roster_gets_sentinel() {
        assert_eq!(directory().manager_name(99), "N/A (roster 99)");
    }
}
