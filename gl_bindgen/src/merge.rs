////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The symbol merge engine.
//!
//! Folds an ordered feature sequence into the final enum and command sets
//! for one generation run. Containers are insertion-ordered throughout:
//! emission order is first-introduction order, never hash order, so two runs
//! over the same spec produce byte-identical output.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::spec::{Cmd, Enum, Feature, Profile};

/// The symbol sets visible for one `(api, version, profile)` request.
///
/// Both sets are deduplicated by name and borrow from the spec; they live
/// for a single generation run.
#[derive(Debug, Default)]
pub struct ResolvedSymbolSet<'a> {
    pub enums: Vec<&'a Enum>,
    pub cmds: Vec<&'a Cmd>,
}

/// Merges `features` (version ascending) under `profile`.
///
/// Every feature's enums and commands are unioned, first introduction
/// winning on name collisions. Under [`Profile::Core`] the union of all
/// removal sets is then subtracted from both sides; under
/// [`Profile::Compatibility`] nothing is ever removed, so a symbol stays
/// visible no matter when a later feature deprecated it.
pub fn merge<'a>(features: &[&'a Feature], profile: Profile) -> ResolvedSymbolSet<'a> {
    let mut enums: IndexMap<&str, &Enum> = IndexMap::new();
    let mut cmds: IndexMap<&str, &Cmd> = IndexMap::new();

    for feature in features {
        for enm in &feature.enums {
            enums.entry(enm.ident.as_str()).or_insert(enm);
        }
        for cmd in &feature.cmds {
            cmds.entry(cmd.proto.ident.as_str()).or_insert(cmd);
        }
    }

    if profile == Profile::Core {
        let removed = removed_names(features);
        // subtracting a name no feature introduced is a no-op
        enums.retain(|ident, _| !removed.contains(*ident));
        cmds.retain(|ident, _| !removed.contains(*ident));
    }

    debug!(
        "merged {} features into {} enums and {} commands ({})",
        features.len(),
        enums.len(),
        cmds.len(),
        profile
    );

    ResolvedSymbolSet {
        enums: enums.into_values().collect(),
        cmds: cmds.into_values().collect(),
    }
}

/// Union of every feature's removal set, in first-occurrence order.
pub fn removed_names<'a>(features: &[&'a Feature]) -> IndexSet<&'a str> {
    features
        .iter()
        .flat_map(|feature| feature.removed.iter().map(String::as_str))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Api, Feature};

    fn feature(
        name: &str,
        number: (u8, u8),
        enums: &[(&str, &str)],
        cmds: &[&str],
        removed: &[&str],
    ) -> Feature {
        let mut feature = Feature::new(Api::Gl, name, number);
        feature.enums = enums.iter().map(|&(ident, value)| Enum::new(ident, value)).collect();
        feature.cmds = cmds.iter().map(|&ident| Cmd::new(ident, "void", vec![])).collect();
        feature.removed = removed.iter().map(|&name| name.to_owned()).collect();
        feature
    }

    fn idents<'a>(resolved: &ResolvedSymbolSet<'a>) -> (Vec<&'a str>, Vec<&'a str>) {
        (
            resolved.enums.iter().map(|e| e.ident.as_str()).collect(),
            resolved.cmds.iter().map(|c| c.proto.ident.as_str()).collect(),
        )
    }

    #[test]
    fn core_strips_symbols_removed_by_later_features() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("A", "1")], &["f"], &[]);
        let v2 = feature("GL_VERSION_2_0", (2, 0), &[("B", "2")], &["g"], &["A"]);

        let resolved = merge(&[&v1, &v2], Profile::Core);
        let (enums, cmds) = idents(&resolved);
        assert_eq!(enums, vec!["B"]);
        assert_eq!(cmds, vec!["f", "g"]);
    }

    #[test]
    fn compatibility_never_removes() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("A", "1")], &["f"], &[]);
        let v2 = feature("GL_VERSION_2_0", (2, 0), &[("B", "2")], &["g"], &["A", "f"]);

        let resolved = merge(&[&v1, &v2], Profile::Compatibility);
        let (enums, cmds) = idents(&resolved);
        assert_eq!(enums, vec!["A", "B"]);
        assert_eq!(cmds, vec!["f", "g"]);
    }

    #[test]
    fn core_strips_symbols_removed_by_the_introducing_feature() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("A", "1"), ("B", "2")], &[], &["B"]);

        let resolved = merge(&[&v1], Profile::Core);
        let (enums, _) = idents(&resolved);
        assert_eq!(enums, vec!["A"]);
    }

    #[test]
    fn removing_an_unknown_symbol_is_a_noop() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("A", "1")], &["f"], &["NOT_A_SYMBOL"]);

        let resolved = merge(&[&v1], Profile::Core);
        let (enums, cmds) = idents(&resolved);
        assert_eq!(enums, vec!["A"]);
        assert_eq!(cmds, vec!["f"]);
    }

    #[test]
    fn duplicate_introductions_collapse_to_the_first() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("A", "1")], &["f"], &[]);
        let v2 = feature("GL_VERSION_1_1", (1, 1), &[("A", "1"), ("B", "2")], &["f", "g"], &[]);

        let resolved = merge(&[&v1, &v2], Profile::Compatibility);
        let (enums, cmds) = idents(&resolved);
        assert_eq!(enums, vec!["A", "B"]);
        assert_eq!(cmds, vec!["f", "g"]);
    }

    #[test]
    fn order_is_first_introduction_order() {
        let v1 = feature("GL_VERSION_1_0", (1, 0), &[("Z", "26"), ("A", "1")], &["z", "a"], &[]);
        let v2 = feature("GL_VERSION_1_1", (1, 1), &[("M", "13")], &["m"], &[]);

        let resolved = merge(&[&v1, &v2], Profile::Compatibility);
        let (enums, cmds) = idents(&resolved);
        assert_eq!(enums, vec!["Z", "A", "M"]);
        assert_eq!(cmds, vec!["z", "a", "m"]);
    }
}
