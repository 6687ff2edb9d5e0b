////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The writer contract and its concrete implementations.
//!
//! Generation stages only ever call the primitives on [`Writer`]; they never
//! format target-language syntax themselves. Adding an output language means
//! implementing this trait and nothing else.
//!
//! Type strings in the spec use a neutral C-like vocabulary: a base name,
//! optionally prefixed `const ` and suffixed with up to two `*`. Base names
//! are either fixed-width neutral names (`void`, `bool8`, `char8`, `int8`
//! through `uint64`, `float32`, `float64`, `intptr`, `sizeiptr`) that each
//! writer maps through its own type table, or spec-defined aliases passed
//! through untranslated.

use std::io;

use crate::loader::LoaderProtocol;
use crate::spec::{Api, Cmd, Enum};

pub mod d_writer;
pub mod rust_writer;

#[cfg(test)]
pub(crate) mod recording;

pub use d_writer::DWriter;
pub use rust_writer::RustWriter;

/// The fixed artifacts every generation run produces, in emission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Module {
    Types,
    Enums,
    Functions,
    Extensions,
    Loader,
}

impl Module {
    /// Artifact name, used by writers that emit one file per module.
    pub fn name(self) -> &'static str {
        match self {
            Module::Types => "types",
            Module::Enums => "enums",
            Module::Functions => "funcs",
            Module::Extensions => "ext",
            Module::Loader => "loader",
        }
    }
}

/// Abstract sink for one generation run.
///
/// The orchestrator opens and closes modules around the stage calls; the
/// `begin_*`/`end_*` section hooks delimit the grouped prototype and storage
/// declarations and default to no-ops for languages that do not need
/// grouping.
pub trait Writer {
    fn begin_module(&mut self, module: Module) -> io::Result<()>;
    fn end_module(&mut self, module: Module) -> io::Result<()>;

    /// `ident` becomes a name for `ty`.
    fn write_alias(&mut self, ident: &str, ty: &str) -> io::Result<()>;
    /// Declares a type only ever handled through pointers.
    fn write_opaque_type(&mut self, ident: &str) -> io::Result<()>;
    fn write_enum(&mut self, enm: &Enum) -> io::Result<()>;
    fn write_function_prototype(&mut self, cmd: &Cmd) -> io::Result<()>;
    /// Declares the pointer slot a loader run stores `cmd`'s address into.
    fn write_function_storage(&mut self, cmd: &Cmd) -> io::Result<()>;
    /// Declares a boolean capability flag for a feature or extension.
    fn write_boolean(&mut self, name: &str) -> io::Result<()>;
    /// Renders the runtime detection and loading sequence.
    fn write_loader(&mut self, protocol: &LoaderProtocol) -> io::Result<()>;

    fn begin_prototypes(&mut self) -> io::Result<()> {
        Ok(())
    }
    fn end_prototypes(&mut self) -> io::Result<()> {
        Ok(())
    }
    fn begin_storage(&mut self) -> io::Result<()> {
        Ok(())
    }
    fn end_storage(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Name of the generated loader state type for `api`.
pub fn api_struct_name(api: Api) -> &'static str {
    match api {
        Api::Gl => "Gl",
        Api::Glx => "Glx",
        Api::Wgl => "Wgl",
        Api::Egl => "Egl",
        Api::GlCore => "GlCore",
        Api::Gles1 => "Gles1",
        Api::Gles2 => "Gles2",
        Api::Glsc2 => "Glsc2",
    }
}

/// Parsed form of a neutral type string.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedTy<'a> {
    pub konst: bool,
    pub base: &'a str,
    pub pointers: usize,
}

pub(crate) fn parse_ty(ty: &str) -> ParsedTy {
    let mut rest = ty.trim();
    let mut pointers = 0;
    while let Some(stripped) = rest.strip_suffix('*') {
        pointers += 1;
        rest = stripped.trim_end();
    }
    let konst = rest.starts_with("const ");
    if konst {
        rest = rest["const ".len()..].trim();
    }
    ParsedTy { konst, base: rest, pointers }
}
