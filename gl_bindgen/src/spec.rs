////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The in-memory API specification the generator consumes.
//!
//! A [`Spec`] is built upstream (by a registry parser or by hand) and handed
//! to [`generate`](crate::generate), which only ever reads it. Feature tables
//! are keyed by version so iteration is oldest-to-newest; extension tables
//! keep insertion order so "all extensions" defaults deterministically.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::Error;

/// Version number of a feature, `(major, minor)`.
pub type Version = (u8, u8);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Api {
    Gl,
    Glx,
    Wgl,
    Egl,
    GlCore,
    Gles1,
    Gles2,
    Glsc2,
}

impl fmt::Display for Api {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Api::Gl => write!(fmt, "gl"),
            Api::Glx => write!(fmt, "glx"),
            Api::Wgl => write!(fmt, "wgl"),
            Api::Egl => write!(fmt, "egl"),
            Api::GlCore => write!(fmt, "glcore"),
            Api::Gles1 => write!(fmt, "gles1"),
            Api::Gles2 => write!(fmt, "gles2"),
            Api::Glsc2 => write!(fmt, "glsc2"),
        }
    }
}

impl FromStr for Api {
    type Err = Error;

    fn from_str(s: &str) -> Result<Api, Error> {
        match s {
            "gl" => Ok(Api::Gl),
            "glx" => Ok(Api::Glx),
            "wgl" => Ok(Api::Wgl),
            "egl" => Ok(Api::Egl),
            "glcore" => Ok(Api::GlCore),
            "gles1" => Ok(Api::Gles1),
            "gles2" => Ok(Api::Gles2),
            "glsc2" => Ok(Api::Glsc2),
            _ => Err(Error::UnknownApi(s.to_owned())),
        }
    }
}

/// Symbol visibility policy.
///
/// `Compatibility` keeps every symbol ever introduced; `Core` strips the
/// symbols marked removed by any feature up to the target version.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Profile {
    Core,
    Compatibility,
}

impl fmt::Display for Profile {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Profile::Core => write!(fmt, "core"),
            Profile::Compatibility => write!(fmt, "compatibility"),
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Profile, Error> {
        match s {
            "core" => Ok(Profile::Core),
            // the misspelling is accepted because years of scripts ask for it
            "compatibility" | "compatability" => Ok(Profile::Compatibility),
            _ => Err(Error::UnknownProfile(s.to_owned())),
        }
    }
}

/// A single named constant. Identity for deduplication is `ident`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Enum {
    pub ident: String,
    /// Literal value, emitted verbatim.
    pub value: String,
    /// Width hint in the neutral type vocabulary, e.g. `"uint8"`. Writers
    /// fall back to `"uint32"` when absent.
    pub ty: Option<String>,
    /// Classification tag from the upstream registry.
    pub group: Option<String>,
}

impl Enum {
    pub fn new(ident: impl Into<String>, value: impl Into<String>) -> Enum {
        Enum { ident: ident.into(), value: value.into(), ty: None, group: None }
    }

    pub fn with_ty(mut self, ty: impl Into<String>) -> Enum {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Enum {
        self.group = Some(group.into());
        self
    }
}

/// A name/type pair: a command parameter or its return slot.
///
/// `ty` uses the neutral vocabulary described at [`crate::writers`]: a base
/// name, optionally prefixed `const ` and suffixed with up to two `*`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub ident: String,
    pub ty: String,
}

impl Binding {
    pub fn new(ident: impl Into<String>, ty: impl Into<String>) -> Binding {
        Binding { ident: ident.into(), ty: ty.into() }
    }
}

/// A function signature. Identity for deduplication is `proto.ident`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cmd {
    /// Name and return type.
    pub proto: Binding,
    pub params: Vec<Binding>,
}

impl Cmd {
    pub fn new(ident: impl Into<String>, ret: impl Into<String>, params: Vec<Binding>) -> Cmd {
        Cmd { proto: Binding::new(ident, ret), params }
    }
}

/// One API version's delta: the symbols it introduces and the names it
/// strips under the core profile.
#[derive(Clone, Debug)]
pub struct Feature {
    pub api: Api,
    /// Capability flag name, e.g. `GL_VERSION_1_1`.
    pub name: String,
    pub number: Version,
    pub enums: Vec<Enum>,
    pub cmds: Vec<Cmd>,
    /// Symbol names removed when targeting [`Profile::Core`]. A name never
    /// introduced by any feature is silently ignored.
    pub removed: Vec<String>,
}

impl Feature {
    pub fn new(api: Api, name: impl Into<String>, number: Version) -> Feature {
        Feature {
            api,
            name: name.into(),
            number,
            enums: Vec::new(),
            cmds: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// An optional symbol bundle independent of the version sequence.
///
/// Extensions may re-expose names that later became core ("promoted"
/// extensions); deduplication against the core set happens at resolve time.
#[derive(Clone, Debug)]
pub struct Extension {
    pub name: String,
    pub enums: Vec<Enum>,
    pub cmds: Vec<Cmd>,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Extension {
        Extension { name: name.into(), enums: Vec::new(), cmds: Vec::new() }
    }
}

/// Entry of the type-alias table.
#[derive(Clone, Debug)]
pub enum TypeDef {
    /// `ident` names `ty` (neutral vocabulary, or another spec-defined type).
    Alias { ident: String, ty: String },
    /// A type only ever handled through pointers.
    Opaque { ident: String },
}

/// The full specification: ordered feature sequences, extension tables and
/// the type-alias table. Owned by the caller, never mutated here.
#[derive(Debug, Default)]
pub struct Spec {
    pub features: BTreeMap<Api, BTreeMap<Version, Feature>>,
    pub extensions: BTreeMap<Api, IndexMap<String, Extension>>,
    pub types: Vec<TypeDef>,
}

impl Spec {
    pub fn new() -> Spec {
        Spec::default()
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.entry(feature.api).or_default().insert(feature.number, feature);
    }

    pub fn add_extension(&mut self, api: Api, extension: Extension) {
        self.extensions.entry(api).or_default().insert(extension.name.clone(), extension);
    }

    pub fn alias(&mut self, ident: impl Into<String>, ty: impl Into<String>) {
        self.types.push(TypeDef::Alias { ident: ident.into(), ty: ty.into() });
    }

    pub fn opaque(&mut self, ident: impl Into<String>) {
        self.types.push(TypeDef::Opaque { ident: ident.into() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_from_str_accepts_historic_spelling() {
        assert_eq!("core".parse::<Profile>().unwrap(), Profile::Core);
        assert_eq!("compatibility".parse::<Profile>().unwrap(), Profile::Compatibility);
        assert_eq!("compatability".parse::<Profile>().unwrap(), Profile::Compatibility);
        assert!(matches!("debug".parse::<Profile>(), Err(Error::UnknownProfile(_))));
    }

    #[test]
    fn api_roundtrips_through_strings() {
        for api in [Api::Gl, Api::Glx, Api::Wgl, Api::Egl, Api::GlCore, Api::Gles1, Api::Gles2, Api::Glsc2] {
            assert_eq!(api.to_string().parse::<Api>().unwrap(), api);
        }
        assert!(matches!("vulkan".parse::<Api>(), Err(Error::UnknownApi(_))));
    }

    #[test]
    fn features_iterate_in_version_order() {
        let mut spec = Spec::new();
        spec.add_feature(Feature::new(Api::Gl, "GL_VERSION_2_0", (2, 0)));
        spec.add_feature(Feature::new(Api::Gl, "GL_VERSION_1_0", (1, 0)));
        spec.add_feature(Feature::new(Api::Gl, "GL_VERSION_1_5", (1, 5)));

        let versions: Vec<Version> = spec.features[&Api::Gl].keys().copied().collect();
        assert_eq!(versions, vec![(1, 0), (1, 5), (2, 0)]);
    }
}
