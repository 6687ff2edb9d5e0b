////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Orchestration of one generation run.
//!
//! Validation happens first and completely: a rejected request never reaches
//! the writer, so no partial artifacts exist for bad input. A sink failure
//! mid-run is reported but not rolled back.

use log::debug;

use crate::error::Error;
use crate::ext::resolve_extensions;
use crate::loader::LoaderProtocol;
use crate::merge::{merge, ResolvedSymbolSet};
use crate::spec::{Api, Enum, Extension, Feature, Profile, Spec, TypeDef, Version};
use crate::writers::{Module, Writer};

/// Constants every enums artifact opens with, regardless of the requested
/// version. Feature enums grouped `SpecialNumbers` are skipped in favor of
/// these fixed definitions with explicit widths.
const SPECIAL_NUMBERS: &[(&str, &str, Option<&str>)] = &[
    ("GL_FALSE", "0", Some("uint8")),
    ("GL_TRUE", "1", Some("uint8")),
    ("GL_NO_ERROR", "0", None),
    ("GL_NONE", "0", None),
    ("GL_ZERO", "0", None),
    ("GL_ONE", "1", None),
    ("GL_INVALID_INDEX", "0xFFFFFFFF", None),
    ("GL_TIMEOUT_IGNORED", "0xFFFFFFFFFFFFFFFF", Some("uint64")),
    ("GL_TIMEOUT_IGNORED_APPLE", "0xFFFFFFFFFFFFFFFF", Some("uint64")),
];

const SPECIAL_NUMBERS_GROUP: &str = "SpecialNumbers";

/// Generates the four artifacts (types, enums + functions, extensions,
/// loader) for one `(api, version, profile)` request through `writer`.
///
/// `version` defaults to the highest version known for `api`; `extensions`
/// defaults to every extension known for `api`, in spec order. Explicitly
/// requested extensions are emitted in the order given.
pub fn generate<W: Writer>(
    spec: &Spec,
    api: Api,
    version: Option<Version>,
    profile: Profile,
    extensions: Option<&[&str]>,
    writer: &mut W,
) -> Result<(), Error> {
    let known_features =
        spec.features.get(&api).ok_or_else(|| Error::UnknownApi(api.to_string()))?;

    let version = match version {
        Some(version) if known_features.contains_key(&version) => version,
        Some(version) => return Err(Error::UnknownVersion(version.0, version.1)),
        // the feature table is version-keyed, so the last key is the newest
        None => match known_features.keys().next_back() {
            Some(&version) => version,
            None => return Err(Error::UnknownApi(api.to_string())),
        },
    };

    let known_extensions = spec.extensions.get(&api);
    let requested: Vec<&Extension> = match extensions {
        Some(names) => names
            .iter()
            .map(|&name| {
                known_extensions
                    .and_then(|table| table.get(name))
                    .ok_or_else(|| Error::UnknownExtension(name.to_owned()))
            })
            .collect::<Result<_, _>>()?,
        None => known_extensions.map(|table| table.values().collect()).unwrap_or_default(),
    };

    debug!(
        "generating {} {}.{} {} with {} extensions",
        api,
        version.0,
        version.1,
        profile,
        requested.len()
    );

    generate_types(spec, writer)?;

    let features: Vec<&Feature> =
        known_features.range(..=version).map(|(_, feature)| feature).collect();
    let resolved = merge(&features, profile);
    generate_features(&features, &resolved, writer)?;

    writer.begin_module(Module::Extensions)?;
    resolve_extensions(writer, &requested, &resolved)?;
    writer.end_module(Module::Extensions)?;

    let protocol = LoaderProtocol::new(api, &features, &requested, profile);
    writer.begin_module(Module::Loader)?;
    writer.write_loader(&protocol)?;
    writer.end_module(Module::Loader)?;

    Ok(())
}

fn generate_types<W: Writer>(spec: &Spec, writer: &mut W) -> Result<(), Error> {
    writer.begin_module(Module::Types)?;
    for def in &spec.types {
        match def {
            TypeDef::Alias { ident, ty } => writer.write_alias(ident, ty)?,
            TypeDef::Opaque { ident } => writer.write_opaque_type(ident)?,
        }
    }
    writer.end_module(Module::Types)?;
    Ok(())
}

fn generate_features<W: Writer>(
    features: &[&Feature],
    resolved: &ResolvedSymbolSet,
    writer: &mut W,
) -> Result<(), Error> {
    writer.begin_module(Module::Enums)?;
    for &(ident, value, ty) in SPECIAL_NUMBERS {
        let mut enm = Enum::new(ident, value);
        enm.ty = ty.map(str::to_owned);
        writer.write_enum(&enm)?;
    }
    for enm in &resolved.enums {
        if enm.group.as_deref() == Some(SPECIAL_NUMBERS_GROUP) {
            continue;
        }
        writer.write_enum(enm)?;
    }
    writer.end_module(Module::Enums)?;

    writer.begin_module(Module::Functions)?;
    for feature in features {
        writer.write_boolean(&feature.name)?;
    }
    writer.begin_prototypes()?;
    for cmd in &resolved.cmds {
        writer.write_function_prototype(cmd)?;
    }
    writer.end_prototypes()?;
    writer.begin_storage()?;
    for cmd in &resolved.cmds {
        writer.write_function_storage(cmd)?;
    }
    writer.end_storage()?;
    writer.end_module(Module::Functions)?;
    Ok(())
}
