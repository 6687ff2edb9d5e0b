////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The extension resolver.
//!
//! Many extensions were later promoted into core under the same symbol
//! names. Core symbols are written first and therefore always win; an
//! extension only contributes the delta that is not already on the page.
//! Deduplication is by name across the entire generation run.

use indexmap::IndexSet;
use log::debug;

use crate::error::Error;
use crate::merge::ResolvedSymbolSet;
use crate::spec::Extension;
use crate::writers::Writer;

/// Emits the extensions module body: per extension a capability flag plus
/// every enum not already written, then the grouped prototype and storage
/// declarations for the commands that survived deduplication.
pub fn resolve_extensions<W: Writer>(
    writer: &mut W,
    extensions: &[&Extension],
    core: &ResolvedSymbolSet,
) -> Result<(), Error> {
    let mut written: IndexSet<&str> = core
        .enums
        .iter()
        .map(|enm| enm.ident.as_str())
        .chain(core.cmds.iter().map(|cmd| cmd.proto.ident.as_str()))
        .collect();

    for ext in extensions {
        writer.write_boolean(&ext.name)?;
        for enm in &ext.enums {
            if written.insert(enm.ident.as_str()) {
                writer.write_enum(enm)?;
            }
        }
    }

    let mut new_cmds = Vec::new();
    for ext in extensions {
        for cmd in &ext.cmds {
            if written.insert(cmd.proto.ident.as_str()) {
                new_cmds.push(cmd);
            }
        }
    }

    writer.begin_prototypes()?;
    for cmd in &new_cmds {
        writer.write_function_prototype(cmd)?;
    }
    writer.end_prototypes()?;

    writer.begin_storage()?;
    for cmd in &new_cmds {
        writer.write_function_storage(cmd)?;
    }
    writer.end_storage()?;

    debug!("{} extensions contributed {} new commands", extensions.len(), new_cmds.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::spec::{Api, Cmd, Enum, Feature, Profile};
    use crate::writers::recording::RecordingWriter;

    fn core_with(cmds: &[&str]) -> Feature {
        let mut feature = Feature::new(Api::Gl, "GL_VERSION_1_0", (1, 0));
        feature.cmds = cmds.iter().map(|&ident| Cmd::new(ident, "void", vec![])).collect();
        feature
    }

    #[test]
    fn promoted_commands_are_not_redeclared() {
        let core_feature = core_with(&["f"]);
        let core = merge(&[&core_feature], Profile::Core);

        let mut ext = Extension::new("GL_EXT_promoted");
        ext.cmds.push(Cmd::new("f", "void", vec![]));
        ext.cmds.push(Cmd::new("h", "void", vec![]));

        let mut writer = RecordingWriter::new();
        resolve_extensions(&mut writer, &[&ext], &core).unwrap();

        assert_eq!(writer.names_of("proto"), vec!["h"]);
        assert_eq!(writer.names_of("storage"), vec!["h"]);
        assert_eq!(writer.names_of("flag"), vec!["GL_EXT_promoted"]);
    }

    #[test]
    fn duplicate_symbols_across_extensions_emit_once() {
        let core = ResolvedSymbolSet::default();

        let mut first = Extension::new("GL_EXT_a");
        first.enums.push(Enum::new("SHARED", "1"));
        first.cmds.push(Cmd::new("glShared", "void", vec![]));
        let mut second = Extension::new("GL_EXT_b");
        second.enums.push(Enum::new("SHARED", "1"));
        second.cmds.push(Cmd::new("glShared", "void", vec![]));

        let mut writer = RecordingWriter::new();
        resolve_extensions(&mut writer, &[&first, &second], &core).unwrap();

        assert_eq!(writer.names_of("enum"), vec!["SHARED"]);
        assert_eq!(writer.names_of("proto"), vec!["glShared"]);
        assert_eq!(writer.names_of("flag"), vec!["GL_EXT_a", "GL_EXT_b"]);
    }

    #[test]
    fn flag_is_written_even_for_empty_extensions() {
        let core = ResolvedSymbolSet::default();
        let ext = Extension::new("GL_EXT_texture_filter_anisotropic");

        let mut writer = RecordingWriter::new();
        resolve_extensions(&mut writer, &[&ext], &core).unwrap();

        assert_eq!(writer.names_of("flag"), vec!["GL_EXT_texture_filter_anisotropic"]);
        assert!(writer.names_of("proto").is_empty());
    }

    #[test]
    fn core_enums_shadow_extension_enums() {
        let mut core_feature = core_with(&[]);
        core_feature.enums.push(Enum::new("GL_FRAMEBUFFER", "0x8D40"));
        let core = merge(&[&core_feature], Profile::Core);

        let mut ext = Extension::new("GL_ARB_framebuffer_object");
        ext.enums.push(Enum::new("GL_FRAMEBUFFER", "0x8D40"));
        ext.enums.push(Enum::new("GL_READ_FRAMEBUFFER", "0x8CA8"));

        let mut writer = RecordingWriter::new();
        resolve_extensions(&mut writer, &[&ext], &core).unwrap();

        assert_eq!(writer.names_of("enum"), vec!["GL_READ_FRAMEBUFFER"]);
    }
}
