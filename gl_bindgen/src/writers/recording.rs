////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Test-only writer that records every primitive call as one line, so stage
//! tests can assert on emission order without parsing target syntax.

use std::io;

use crate::loader::LoaderProtocol;
use crate::spec::{Cmd, Enum};
use crate::writers::{Module, Writer};

#[derive(Default)]
pub(crate) struct RecordingWriter {
    pub ops: Vec<String>,
}

impl RecordingWriter {
    pub fn new() -> RecordingWriter {
        RecordingWriter::default()
    }

    /// All recorded names for ops of the given kind, e.g. `"enum"`.
    pub fn names_of(&self, kind: &str) -> Vec<&str> {
        let prefix = format!("{} ", kind);
        self.ops
            .iter()
            .filter_map(|op| op.strip_prefix(&prefix))
            .map(|rest| rest.split_whitespace().next().unwrap_or(rest))
            .collect()
    }
}

impl Writer for RecordingWriter {
    fn begin_module(&mut self, module: Module) -> io::Result<()> {
        self.ops.push(format!("begin {}", module.name()));
        Ok(())
    }

    fn end_module(&mut self, module: Module) -> io::Result<()> {
        self.ops.push(format!("end {}", module.name()));
        Ok(())
    }

    fn write_alias(&mut self, ident: &str, ty: &str) -> io::Result<()> {
        self.ops.push(format!("alias {} = {}", ident, ty));
        Ok(())
    }

    fn write_opaque_type(&mut self, ident: &str) -> io::Result<()> {
        self.ops.push(format!("opaque {}", ident));
        Ok(())
    }

    fn write_enum(&mut self, enm: &Enum) -> io::Result<()> {
        self.ops.push(format!("enum {} = {}", enm.ident, enm.value));
        Ok(())
    }

    fn write_function_prototype(&mut self, cmd: &Cmd) -> io::Result<()> {
        self.ops.push(format!("proto {}", cmd.proto.ident));
        Ok(())
    }

    fn write_function_storage(&mut self, cmd: &Cmd) -> io::Result<()> {
        self.ops.push(format!("storage {}", cmd.proto.ident));
        Ok(())
    }

    fn write_boolean(&mut self, name: &str) -> io::Result<()> {
        self.ops.push(format!("flag {}", name));
        Ok(())
    }

    fn write_loader(&mut self, protocol: &LoaderProtocol) -> io::Result<()> {
        self.ops.push(format!("loader {}", protocol.api));
        for feature in &protocol.features {
            self.ops.push(format!(
                "load feature {} {}.{}: {}",
                feature.name,
                feature.number.0,
                feature.number.1,
                feature.cmds.join(" ")
            ));
        }
        for ext in &protocol.extensions {
            self.ops.push(format!("load extension {}: {}", ext.name, ext.cmds.join(" ")));
        }
        Ok(())
    }
}
