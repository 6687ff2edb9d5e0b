////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Rust output, written into a single sink and meant to be `include!`d from
//! a bindings crate's `lib.rs`.
//!
//! Instead of `static mut` pointer globals, the generated code keeps every
//! capability flag and function pointer in one state struct named after the
//! api (`Gl`, `Egl`, ...) with a `new`/`reset`/`load` lifecycle, so a test
//! can drive several independent loader runs in one process. Pointer slots
//! are `Option<extern "system" fn ...>` aliases; a slot is `None` until a
//! load run resolves it.

use std::collections::HashMap;
use std::io;

use lazy_static::lazy_static;

use crate::loader::{
    ExtensionLoad, FeatureLoad, LoaderProtocol, BOOTSTRAP_INDEXED_STRING_GETTER,
    BOOTSTRAP_INTEGER_GETTER, BOOTSTRAP_STRING_GETTER, GL_EXTENSIONS, GL_MAJOR_VERSION,
    GL_MINOR_VERSION,
};
use crate::spec::{Cmd, Enum};
use crate::writers::{api_struct_name, parse_ty, Module, Writer};

lazy_static! {
    /// Neutral vocabulary to Rust primitives. `void` and `char8` are not
    /// here; they translate to `std::os::raw` types and need the import
    /// path of the current module.
    static ref PRIMITIVES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("bool8", "u8");
        map.insert("int8", "i8");
        map.insert("uint8", "u8");
        map.insert("int16", "i16");
        map.insert("uint16", "u16");
        map.insert("int32", "i32");
        map.insert("uint32", "u32");
        map.insert("int64", "i64");
        map.insert("uint64", "u64");
        map.insert("float32", "f32");
        map.insert("float64", "f64");
        map.insert("intptr", "isize");
        map.insert("sizeiptr", "isize");
        map
    };
}

/// Raw identifiers would also work, but a trailing underscore matches what
/// the pre-generated bindings always looked like.
fn sanitize_ident(ident: &str) -> String {
    match ident {
        "as" | "async" | "await" | "box" | "break" | "const" | "continue" | "crate" | "dyn"
        | "else" | "enum" | "extern" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop"
        | "match" | "mod" | "move" | "mut" | "priv" | "pub" | "ref" | "return" | "static"
        | "struct" | "trait" | "type" | "unsafe" | "use" | "where" | "while" => {
            format!("{}_", ident)
        }
        _ => ident.to_owned(),
    }
}

enum Field {
    Flag(String),
    Slot(String),
}

pub struct RustWriter<W: io::Write> {
    dest: W,
    current: Option<Module>,
    started: bool,
    /// Flag and slot declarations are deferred: they become the fields of
    /// the state struct the loader module renders.
    fields: Vec<Field>,
}

impl<W: io::Write> RustWriter<W> {
    pub fn new(dest: W) -> RustWriter<W> {
        RustWriter { dest, current: None, started: false, fields: Vec::new() }
    }

    /// Consumes the writer, handing the sink back.
    pub fn into_inner(self) -> W {
        self.dest
    }

    fn translate_base(&self, base: &str) -> String {
        let imports = match self.current {
            Some(Module::Types) => "super::__gl_imports",
            _ => "__gl_imports",
        };
        match base {
            "void" => format!("{}::raw::c_void", imports),
            "char8" => format!("{}::raw::c_char", imports),
            _ => match PRIMITIVES.get(base) {
                Some(prim) => (*prim).to_owned(),
                // a spec-defined alias; the types module holds it
                None => match self.current {
                    Some(Module::Types) => base.to_owned(),
                    _ => format!("types::{}", base),
                },
            },
        }
    }

    fn translate_ty(&self, ty: &str) -> String {
        let parsed = parse_ty(ty);
        if parsed.pointers == 0 {
            if parsed.base == "void" {
                return "()".to_owned();
            }
            return self.translate_base(parsed.base);
        }
        let mut out = self.translate_base(parsed.base);
        let qualifier = if parsed.konst { "*const " } else { "*mut " };
        for _ in 0..parsed.pointers {
            out = format!("{}{}", qualifier, out);
        }
        out
    }

    fn signature(&self, cmd: &Cmd) -> String {
        let params = cmd
            .params
            .iter()
            .map(|binding| {
                format!("{}: {}", sanitize_ident(&binding.ident), self.translate_ty(&binding.ty))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self.translate_ty(&cmd.proto.ty);
        if ret == "()" {
            format!("extern \"system\" fn({})", params)
        } else {
            format!("extern \"system\" fn({}) -> {}", params, ret)
        }
    }

    fn write_version_struct(&mut self, name: &str) -> io::Result<()> {
        writeln!(
            self.dest,
            r#"
/// Version reported by the driver. A zero record means the bootstrap
/// symbols could not be resolved and nothing was loaded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct {name}Version {{
    pub major: i32,
    pub minor: i32,
}}

#[allow(dead_code)]
fn has_ext(extensions: &str, name: &str) -> bool {{
    extensions.split_whitespace().any(|ext| ext == name)
}}

type BootstrapGetString = Option<extern "system" fn(u32) -> *const u8>;
type BootstrapGetStringi = Option<extern "system" fn(u32, u32) -> *const u8>;
type BootstrapGetIntegerv = Option<extern "system" fn(u32, *mut i32)>;"#,
            name = name
        )
    }

    fn write_state_struct(&mut self, name: &str) -> io::Result<()> {
        writeln!(
            self.dest,
            "\n#[allow(non_snake_case, dead_code)]\n#[derive(Default)]\npub struct {} {{",
            name
        )?;
        for field in &self.fields {
            match field {
                Field::Flag(flag) => writeln!(self.dest, "    pub {}: bool,", flag)?,
                Field::Slot(slot) => writeln!(self.dest, "    pub {name}: PFN_{name},", name = slot)?,
            }
        }
        writeln!(
            self.dest,
            "    boot_get_string: BootstrapGetString,\n    boot_get_string_i: BootstrapGetStringi,\n    boot_get_integer: BootstrapGetIntegerv,\n}}"
        )
    }

    fn write_load_fn(&mut self, protocol: &LoaderProtocol, version: &str) -> io::Result<()> {
        writeln!(
            self.dest,
            r#"
    /// Runs the full detection and loading sequence against `resolve` and
    /// returns the version the driver reported. Must complete before any
    /// pointer slot is read.
    pub fn load<F>(&mut self, mut resolve: F) -> {version}
    where F: FnMut(&'static str) -> *const __gl_imports::raw::c_void {{
        self.reset();
        self.boot_get_string = unsafe {{ __gl_imports::mem::transmute(resolve("{string_getter}")) }};
        self.boot_get_string_i = unsafe {{ __gl_imports::mem::transmute(resolve("{indexed_getter}")) }};
        self.boot_get_integer = unsafe {{ __gl_imports::mem::transmute(resolve("{integer_getter}")) }};
        if self.boot_get_string.is_none() || self.boot_get_integer.is_none() {{
            return {version}::default();
        }}
        let glv = self.find_core();
        self.find_extensions();"#,
            version = version,
            string_getter = BOOTSTRAP_STRING_GETTER,
            indexed_getter = BOOTSTRAP_INDEXED_STRING_GETTER,
            integer_getter = BOOTSTRAP_INTEGER_GETTER,
        )?;
        for feature in &protocol.features {
            writeln!(self.dest, "        self.load_{}(&mut resolve);", feature.name)?;
        }
        for ext in &protocol.extensions {
            if !ext.cmds.is_empty() {
                writeln!(self.dest, "        self.load_{}(&mut resolve);", ext.name)?;
            }
        }
        writeln!(self.dest, "        glv\n    }}")
    }

    fn write_find_core(&mut self, protocol: &LoaderProtocol, version: &str) -> io::Result<()> {
        writeln!(
            self.dest,
            r#"
    fn find_core(&mut self) -> {version} {{
        let mut major: i32 = 0;
        let mut minor: i32 = 0;
        if let Some(get_integer) = self.boot_get_integer {{
            get_integer({major:#06X}, &mut major);
            get_integer({minor:#06X}, &mut minor);
        }}"#,
            version = version,
            major = GL_MAJOR_VERSION,
            minor = GL_MINOR_VERSION,
        )?;
        for feature in &protocol.features {
            writeln!(
                self.dest,
                "        self.{name} = (major == {maj} && minor >= {min}) || major > {maj};",
                name = feature.name,
                maj = feature.number.0,
                min = feature.number.1,
            )?;
        }
        writeln!(self.dest, "        {} {{ major, minor }}\n    }}", version)
    }

    fn write_find_extensions(&mut self, protocol: &LoaderProtocol) -> io::Result<()> {
        writeln!(
            self.dest,
            r#"
    fn find_extensions(&mut self) {{
        let mut extensions = String::new();
        if let Some(get_string) = self.boot_get_string {{
            let ptr = get_string({extensions:#06X});
            if !ptr.is_null() {{
                extensions = unsafe {{ __gl_imports::ffi::CStr::from_ptr(ptr as *const __gl_imports::raw::c_char) }}
                    .to_string_lossy()
                    .into_owned();
            }}
        }}"#,
            extensions = GL_EXTENSIONS,
        )?;
        for ext in &protocol.extensions {
            writeln!(
                self.dest,
                "        self.{name} = has_ext(&extensions, \"{name}\");",
                name = ext.name
            )?;
        }
        if protocol.extensions.is_empty() {
            writeln!(self.dest, "        let _ = extensions;")?;
        }
        writeln!(self.dest, "    }}")
    }

    fn write_feature_load_fn(&mut self, feature: &FeatureLoad) -> io::Result<()> {
        let resolve = if feature.cmds.is_empty() { "_resolve" } else { "resolve" };
        writeln!(
            self.dest,
            r#"
    fn load_{name}<F>(&mut self, {resolve}: &mut F)
    where F: FnMut(&'static str) -> *const __gl_imports::raw::c_void {{
        if !self.{name} {{
            return;
        }}"#,
            name = feature.name,
            resolve = resolve,
        )?;
        for cmd in &feature.cmds {
            writeln!(
                self.dest,
                "        self.{name} = unsafe {{ __gl_imports::mem::transmute(resolve(\"{name}\")) }};",
                name = cmd
            )?;
        }
        writeln!(self.dest, "    }}")
    }

    fn write_extension_load_fn(&mut self, ext: &ExtensionLoad) -> io::Result<()> {
        writeln!(
            self.dest,
            r#"
    fn load_{name}<F>(&mut self, resolve: &mut F)
    where F: FnMut(&'static str) -> *const __gl_imports::raw::c_void {{
        if !self.{name} {{
            return;
        }}"#,
            name = ext.name,
        )?;
        // extension entry points overwrite anything core already loaded
        for cmd in &ext.cmds {
            writeln!(
                self.dest,
                "        self.{name} = unsafe {{ __gl_imports::mem::transmute(resolve(\"{name}\")) }};",
                name = cmd
            )?;
        }
        writeln!(self.dest, "    }}")
    }
}

impl<W: io::Write> Writer for RustWriter<W> {
    fn begin_module(&mut self, module: Module) -> io::Result<()> {
        if !self.started {
            self.started = true;
            writeln!(
                self.dest,
                "// Generated bindings. Do not edit.\n\nmod __gl_imports {{\n    pub use std::ffi;\n    pub use std::mem;\n    pub use std::os::raw;\n}}"
            )?;
        }
        self.current = Some(module);
        match module {
            Module::Types => writeln!(
                self.dest,
                "\npub mod types {{\n    #![allow(non_camel_case_types, non_snake_case, dead_code, missing_copy_implementations)]\n"
            ),
            _ => writeln!(self.dest, "\n// -- {} --\n", module.name()),
        }
    }

    fn end_module(&mut self, module: Module) -> io::Result<()> {
        self.current = None;
        match module {
            Module::Types => writeln!(self.dest, "}}"),
            _ => Ok(()),
        }
    }

    fn write_alias(&mut self, ident: &str, ty: &str) -> io::Result<()> {
        let ty = self.translate_ty(ty);
        writeln!(self.dest, "    pub type {} = {};", ident, ty)
    }

    fn write_opaque_type(&mut self, ident: &str) -> io::Result<()> {
        writeln!(self.dest, "    pub enum {} {{}}", ident)
    }

    fn write_enum(&mut self, enm: &Enum) -> io::Result<()> {
        let ty = self.translate_ty(enm.ty.as_deref().unwrap_or("uint32"));
        writeln!(
            self.dest,
            "#[allow(dead_code, non_upper_case_globals)] pub const {ident}: {ty} = {value};",
            ident = enm.ident,
            ty = ty,
            value = enm.value,
        )
    }

    fn write_function_prototype(&mut self, cmd: &Cmd) -> io::Result<()> {
        writeln!(
            self.dest,
            "#[allow(non_camel_case_types, dead_code)] pub type PFN_{ident} = Option<{signature}>;",
            ident = cmd.proto.ident,
            signature = self.signature(cmd),
        )
    }

    fn write_function_storage(&mut self, cmd: &Cmd) -> io::Result<()> {
        self.fields.push(Field::Slot(cmd.proto.ident.clone()));
        Ok(())
    }

    fn write_boolean(&mut self, name: &str) -> io::Result<()> {
        self.fields.push(Field::Flag(name.to_owned()));
        Ok(())
    }

    fn write_loader(&mut self, protocol: &LoaderProtocol) -> io::Result<()> {
        let name = api_struct_name(protocol.api);
        let version = format!("{}Version", name);

        self.write_version_struct(name)?;
        self.write_state_struct(name)?;

        writeln!(
            self.dest,
            r#"
#[allow(non_snake_case)]
impl {name} {{
    pub fn new() -> {name} {{
        {name}::default()
    }}

    /// Clears every capability flag and function pointer.
    pub fn reset(&mut self) {{
        *self = {name}::default();
    }}"#,
            name = name
        )?;

        self.write_load_fn(protocol, &version)?;
        self.write_find_core(protocol, &version)?;
        self.write_find_extensions(protocol)?;
        for feature in &protocol.features {
            self.write_feature_load_fn(feature)?;
        }
        for ext in &protocol.extensions {
            if !ext.cmds.is_empty() {
                self.write_extension_load_fn(ext)?;
            }
        }
        writeln!(self.dest, "}}")
    }
}
