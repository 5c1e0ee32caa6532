//! Selection states

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Tri-state selection of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    /// Selected (for a branch: every child selected)
    Checked,
    /// Not selected; also the meaning of an absent entry
    #[default]
    Unchecked,
    /// Branch with a mix of selected and unselected children
    Indeterminate,
}

impl SelectionStatus {
    /// Derive a branch status from its children's statuses
    ///
    /// - all children checked: checked
    /// - any child checked or indeterminate: indeterminate
    /// - otherwise: unchecked
    ///
    /// Returns `None` for a childless branch, which keeps whatever it had.
    #[must_use]
    pub fn derive<I>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut any = false;
        let mut all_checked = true;
        let mut any_marked = false;

        for status in children {
            any = true;
            all_checked &= status == Self::Checked;
            any_marked |= status != Self::Unchecked;
        }

        if !any {
            None
        } else if all_checked {
            Some(Self::Checked)
        } else if any_marked {
            Some(Self::Indeterminate)
        } else {
            Some(Self::Unchecked)
        }
    }

    /// Check if status is `Checked`
    #[inline]
    #[must_use]
    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }
}

impl Display for SelectionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checked => "checked",
            Self::Unchecked => "unchecked",
            Self::Indeterminate => "indeterminate",
        })
    }
}

/// Status a user can request for a node
///
/// Indeterminate is only ever derived, never requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// Check the node and its subtree
    Checked,
    /// Uncheck the node and its subtree
    Unchecked,
}

impl From<TargetStatus> for SelectionStatus {
    fn from(target: TargetStatus) -> Self {
        match target {
            TargetStatus::Checked => Self::Checked,
            TargetStatus::Unchecked => Self::Unchecked,
        }
    }
}

impl From<bool> for TargetStatus {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SelectionStatus::{Checked, Indeterminate, Unchecked};

    #[test]
    fn derive_rules() {
        assert_eq!(SelectionStatus::derive([Checked, Checked]), Some(Checked));
        assert_eq!(SelectionStatus::derive([Unchecked, Unchecked]), Some(Unchecked));
        assert_eq!(SelectionStatus::derive([Checked, Unchecked]), Some(Indeterminate));
        assert_eq!(SelectionStatus::derive([Indeterminate, Unchecked]), Some(Indeterminate));
        assert_eq!(SelectionStatus::derive([Indeterminate, Checked]), Some(Indeterminate));
        assert_eq!(SelectionStatus::derive([]), None);
    }

    #[test]
    fn target_converts() {
        assert_eq!(SelectionStatus::from(TargetStatus::Checked), Checked);
        assert_eq!(TargetStatus::from(false), TargetStatus::Unchecked);
        assert_eq!(SelectionStatus::default(), Unchecked);
        assert_eq!(Indeterminate.to_string(), "indeterminate");
    }
}
