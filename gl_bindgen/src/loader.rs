////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The loader-protocol generator.
//!
//! A generated loader has to mirror how a live driver is probed: resolve the
//! bootstrap symbols, bail out with a zero version if the driver cannot even
//! report what it is, read the version, flag every feature whose
//! introduction version is covered, flag every advertised extension, and
//! only then resolve function pointers behind those flags. This module
//! computes that sequence as data; writers render it into the target
//! language.
//!
//! Gating resolution behind the flags is an ordering contract: the resolve
//! callback is never asked for a symbol the reported capability set does not
//! promise, even though an unresolved lookup merely yields null.

use indexmap::IndexSet;
use log::debug;

use crate::merge::removed_names;
use crate::spec::{Api, Extension, Feature, Profile, Version};

/// Name of the bootstrap string-getter (`GL_EXTENSIONS` etc.).
pub const BOOTSTRAP_STRING_GETTER: &str = "glGetString";
/// Name of the bootstrap indexed string-getter. Resolved up front but not
/// fatal when missing; drivers older than 3.0 do not export it.
pub const BOOTSTRAP_INDEXED_STRING_GETTER: &str = "glGetStringi";
/// Name of the bootstrap integer-getter (`GL_MAJOR_VERSION` etc.).
pub const BOOTSTRAP_INTEGER_GETTER: &str = "glGetIntegerv";

/// Probe constants, emitted as literals so the generated loader never
/// depends on the spec declaring them. Values per the Khronos registry.
pub const GL_MAJOR_VERSION: u32 = 0x821B;
pub const GL_MINOR_VERSION: u32 = 0x821C;
pub const GL_EXTENSIONS: u32 = 0x1F03;

/// One feature's load group: the flag gate and the commands resolved once
/// the gate is true. `cmds` already excludes the profile's removal set.
#[derive(Debug)]
pub struct FeatureLoad<'a> {
    pub name: &'a str,
    pub number: Version,
    pub cmds: Vec<&'a str>,
}

/// One extension's load group. Extensions re-resolve every one of their
/// commands even when a core feature already loaded the same name; an
/// extension's trampoline may differ from the core entry point, so the
/// overwrite is load-bearing. Groups without commands only ever set a flag.
#[derive(Debug)]
pub struct ExtensionLoad<'a> {
    pub name: &'a str,
    pub cmds: Vec<&'a str>,
}

/// The runtime detection and loading sequence for one generation run.
#[derive(Debug)]
pub struct LoaderProtocol<'a> {
    pub api: Api,
    pub features: Vec<FeatureLoad<'a>>,
    pub extensions: Vec<ExtensionLoad<'a>>,
}

impl<'a> LoaderProtocol<'a> {
    pub fn new(
        api: Api,
        features: &[&'a Feature],
        extensions: &[&'a Extension],
        profile: Profile,
    ) -> LoaderProtocol<'a> {
        let removed = match profile {
            Profile::Core => removed_names(features),
            Profile::Compatibility => IndexSet::new(),
        };

        let features = features
            .iter()
            .map(|feature| FeatureLoad {
                name: feature.name.as_str(),
                number: feature.number,
                cmds: feature
                    .cmds
                    .iter()
                    .map(|cmd| cmd.proto.ident.as_str())
                    .filter(|ident| !removed.contains(*ident))
                    .collect(),
            })
            .collect::<Vec<_>>();

        let extensions = extensions
            .iter()
            .map(|ext| ExtensionLoad {
                name: ext.name.as_str(),
                cmds: ext.cmds.iter().map(|cmd| cmd.proto.ident.as_str()).collect(),
            })
            .collect::<Vec<_>>();

        debug!(
            "loader protocol for {}: {} feature groups, {} extension groups",
            api,
            features.len(),
            extensions.len()
        );

        LoaderProtocol { api, features, extensions }
    }
}
