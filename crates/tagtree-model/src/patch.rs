//! Partial leaf updates

use crate::node::Leaf;
use serde::{Deserialize, Serialize};

/// Partial set of leaf fields to merge into an existing leaf
///
/// Absent fields are left untouched. The leaf id is never patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafPatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New secondary information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_information: Option<String>,
    /// New training flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_training: Option<bool>,
}

impl LeafPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set name
    #[inline]
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set secondary information
    #[inline]
    #[must_use]
    pub fn secondary_information(mut self, info: impl Into<String>) -> Self {
        self.secondary_information = Some(info.into());
        self
    }

    /// Set training flag
    #[inline]
    #[must_use]
    pub fn is_training(mut self, flag: bool) -> Self {
        self.is_training = Some(flag);
        self
    }

    /// Check if patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.secondary_information.is_none() && self.is_training.is_none()
    }

    /// Return a copy of `leaf` with this patch merged in
    #[must_use]
    pub fn merged_into(&self, leaf: &Leaf) -> Leaf {
        Leaf {
            id: leaf.id.clone(),
            name: self.name.clone().unwrap_or_else(|| leaf.name.clone()),
            is_training: self.is_training.unwrap_or(leaf.is_training),
            secondary_information: self
                .secondary_information
                .clone()
                .unwrap_or_else(|| leaf.secondary_information.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_present_fields() {
        let leaf = Leaf::new("l", "old").with_secondary("info").training(true);
        let merged = LeafPatch::new().name("new").merged_into(&leaf);

        assert_eq!(merged.id, leaf.id);
        assert_eq!(merged.name, "new");
        assert_eq!(merged.secondary_information, "info");
        assert!(merged.is_training);
    }

    #[test]
    fn empty_patch_is_identity() {
        let leaf = Leaf::new("l", "x").with_secondary("y");
        assert!(LeafPatch::new().is_empty());
        assert_eq!(LeafPatch::new().merged_into(&leaf), leaf);
    }

    #[test]
    fn patch_deserializes_from_request_body() {
        let patch: LeafPatch =
            serde_json::from_str(r#"{"secondaryInformation":"s","isTraining":false}"#).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.secondary_information.as_deref(), Some("s"));
        assert_eq!(patch.is_training, Some(false));
    }
}
