// ── Device categories and subtype allow-lists ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Entity family a device subtype belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    Cover,
    Switch,
    Light,
    BinarySensor,
}

impl Category {
    /// The subtypes this category claims.
    pub fn subtypes(self) -> &'static [&'static str] {
        match self {
            Self::Cover => &["shutter", "blind", "awning", "curtain", "garage_door"],
            Self::Switch => &["socket", "watering"],
            Self::Light => &["light"],
            Self::BinarySensor => &[
                "door",
                "window",
                "motiondetector",
                "smokedetector",
                "waterdetector",
            ],
        }
    }

    /// Look up the category of a subtype. Matching is exact.
    pub fn from_subtype(subtype: &str) -> Option<Self> {
        Self::iter().find(|c| c.subtypes().contains(&subtype))
    }
}

/// Subtype allow-list applied by the fetcher.
///
/// The default keeps every subtype of every category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtypeFilter {
    subtypes: BTreeSet<String>,
}

impl SubtypeFilter {
    /// Union of all category allow-lists.
    pub fn all() -> Self {
        Self::for_categories(Category::iter())
    }

    pub fn for_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let subtypes = categories
            .into_iter()
            .flat_map(|c| c.subtypes().iter().map(|s| (*s).to_owned()))
            .collect();
        Self { subtypes }
    }

    /// An explicit allow-list, for subtypes no category claims yet.
    pub fn from_subtypes<S: Into<String>>(subtypes: impl IntoIterator<Item = S>) -> Self {
        Self {
            subtypes: subtypes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, subtype: &str) -> bool {
        self.subtypes.contains(subtype)
    }

    pub fn subtypes(&self) -> impl Iterator<Item = &str> {
        self.subtypes.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.subtypes.is_empty()
    }
}

impl Default for SubtypeFilter {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn subtype_lookup() {
        assert_eq!(Category::from_subtype("garage_door"), Some(Category::Cover));
        assert_eq!(Category::from_subtype("watering"), Some(Category::Switch));
        assert_eq!(Category::from_subtype("light"), Some(Category::Light));
        assert_eq!(Category::from_subtype("smokedetector"), Some(Category::BinarySensor));
        assert_eq!(Category::from_subtype("Shutter"), None);
        assert_eq!(Category::from_subtype("thermostat"), None);
    }

    #[test]
    fn category_names_round_trip_through_strum() {
        assert_eq!(Category::BinarySensor.to_string(), "binary_sensor");
        assert_eq!("cover".parse::<Category>().unwrap(), Category::Cover);
        assert_eq!("Binary_Sensor".parse::<Category>().unwrap(), Category::BinarySensor);
        assert!("sensor".parse::<Category>().is_err());
    }

    #[test]
    fn cover_filter_only_allows_covers() {
        let filter = SubtypeFilter::for_categories([Category::Cover]);
        for subtype in ["shutter", "blind", "awning", "curtain", "garage_door"] {
            assert!(filter.allows(subtype), "{subtype} should be allowed");
        }
        assert!(!filter.allows("door"));
        assert!(!filter.allows("light"));
    }

    #[test]
    fn default_filter_is_union_of_categories() {
        let filter = SubtypeFilter::default();
        assert_eq!(filter.subtypes().count(), 13);
        assert!(filter.allows("socket"));
        assert!(filter.allows("waterdetector"));
        assert!(!filter.allows("thermostat"));
    }

    #[test]
    fn explicit_subtypes() {
        let filter = SubtypeFilter::from_subtypes(["thermostat"]);
        assert!(filter.allows("thermostat"));
        assert!(!filter.allows("shutter"));
    }
}
