////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! D output, one file per module under a target directory.
//!
//! The emitted shape matches the D bindings this generator grew out of:
//! `module <pkg>.<name>;` headers with private imports, old-style aliases,
//! grouped `extern(System) @nogc nothrow` prototype blocks, `__gshared`
//! pointer storage and a loader built around `find_core`/`find_extensions`.
//! The loader resolves the bootstrap symbols through their declared storage
//! slots, so the spec must declare them for the output to compile.

use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::PathBuf;

use crate::loader::{LoaderProtocol, GL_EXTENSIONS, GL_MAJOR_VERSION, GL_MINOR_VERSION};
use crate::spec::{Cmd, Enum};
use crate::writers::{api_struct_name, parse_ty, Module, Writer};

fn sanitize_ident(ident: &str) -> String {
    match ident {
        "alias" | "function" | "in" | "module" | "out" | "ref" | "scope" | "version" => {
            format!("{}_", ident)
        }
        _ => ident.to_owned(),
    }
}

fn translate_base(base: &str) -> &str {
    match base {
        "char8" => "char",
        "bool8" => "ubyte",
        "int8" => "byte",
        "uint8" => "ubyte",
        "int16" => "short",
        "uint16" => "ushort",
        "int32" => "int",
        "uint32" => "uint",
        "int64" => "long",
        "uint64" => "ulong",
        "float32" => "float",
        "float64" => "double",
        "intptr" => "ptrdiff_t",
        "sizeiptr" => "ptrdiff_t",
        other => other,
    }
}

fn translate_ty(ty: &str) -> String {
    let parsed = parse_ty(ty);
    let base = translate_base(parsed.base);
    let stars = "*".repeat(parsed.pointers);
    if parsed.konst {
        format!("const({}){}", base, stars)
    } else {
        format!("{}{}", base, stars)
    }
}

fn parameters(cmd: &Cmd) -> String {
    cmd.params
        .iter()
        .map(|binding| format!("{} {}", translate_ty(&binding.ty), sanitize_ident(&binding.ident)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DWriter {
    path: PathBuf,
    package: String,
    dest: Option<BufWriter<fs::File>>,
}

impl DWriter {
    /// Creates the target directory. `package` is the D package the module
    /// declarations live under, e.g. `"gl"`.
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> io::Result<DWriter> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(DWriter { path, package: package.into(), dest: None })
    }

    fn dest(&mut self) -> io::Result<&mut BufWriter<fs::File>> {
        self.dest
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "write outside of a module"))
    }
}

impl Writer for DWriter {
    fn begin_module(&mut self, module: Module) -> io::Result<()> {
        let file = fs::File::create(self.path.join(format!("{}.d", module.name())))?;
        let mut dest = BufWriter::new(file);
        writeln!(dest, "module {}.{};\n", self.package, module.name())?;

        // mirror of the import lists the hand-maintained bindings carried
        let imports: &[Module] = match module {
            Module::Types | Module::Enums => &[],
            Module::Functions => &[Module::Types],
            Module::Extensions => &[Module::Types, Module::Enums, Module::Functions],
            Module::Loader => {
                &[Module::Functions, Module::Extensions, Module::Enums, Module::Types]
            }
        };
        for import in imports {
            writeln!(dest, "private import {}.{};", self.package, import.name())?;
        }
        if !imports.is_empty() {
            writeln!(dest)?;
        }

        self.dest = Some(dest);
        Ok(())
    }

    fn end_module(&mut self, _module: Module) -> io::Result<()> {
        if let Some(mut dest) = self.dest.take() {
            dest.flush()?;
        }
        Ok(())
    }

    fn write_alias(&mut self, ident: &str, ty: &str) -> io::Result<()> {
        let ty = translate_ty(ty);
        writeln!(self.dest()?, "alias {} {};", ty, ident)
    }

    fn write_opaque_type(&mut self, ident: &str) -> io::Result<()> {
        writeln!(self.dest()?, "struct {};", ident)
    }

    fn write_enum(&mut self, enm: &Enum) -> io::Result<()> {
        let ty = translate_ty(enm.ty.as_deref().unwrap_or("uint32"));
        writeln!(self.dest()?, "enum {} {} = {};", ty, enm.ident, enm.value)
    }

    fn write_function_prototype(&mut self, cmd: &Cmd) -> io::Result<()> {
        let ret = translate_ty(&cmd.proto.ty);
        writeln!(
            self.dest()?,
            "\talias {} function({}) fp_{};",
            ret,
            parameters(cmd),
            cmd.proto.ident
        )
    }

    fn write_function_storage(&mut self, cmd: &Cmd) -> io::Result<()> {
        writeln!(self.dest()?, "\tfp_{name} {name};", name = cmd.proto.ident)
    }

    fn write_boolean(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.dest()?, "__gshared bool {};", name)
    }

    fn begin_prototypes(&mut self) -> io::Result<()> {
        writeln!(self.dest()?, "\nextern(System) @nogc nothrow {{")
    }

    fn end_prototypes(&mut self) -> io::Result<()> {
        writeln!(self.dest()?, "}}")
    }

    fn begin_storage(&mut self) -> io::Result<()> {
        writeln!(self.dest()?, "\n__gshared {{")
    }

    fn end_storage(&mut self) -> io::Result<()> {
        writeln!(self.dest()?, "}}")
    }

    fn write_loader(&mut self, protocol: &LoaderProtocol) -> io::Result<()> {
        let load_name = format!("load{}", api_struct_name(protocol.api));
        let dest = self.dest()?;

        writeln!(dest, "struct GLVersion {{ int major; int minor; }}\n")?;

        writeln!(dest, "GLVersion {}(void* function(const(char)* name) load) {{", load_name)?;
        writeln!(dest, "\tglGetString = cast(typeof(glGetString))load(\"glGetString\\0\".ptr);")?;
        writeln!(dest, "\tglGetStringi = cast(typeof(glGetStringi))load(\"glGetStringi\\0\".ptr);")?;
        writeln!(dest, "\tglGetIntegerv = cast(typeof(glGetIntegerv))load(\"glGetIntegerv\\0\".ptr);")?;
        writeln!(dest, "\tif(glGetString is null || glGetIntegerv is null) {{ GLVersion glv; return glv; }}\n")?;
        writeln!(dest, "\tGLVersion glv = find_core();")?;
        writeln!(dest, "\tfind_extensions();")?;
        for feature in &protocol.features {
            writeln!(dest, "\tload_gl_{}(load);", feature.name)?;
        }
        for ext in &protocol.extensions {
            if !ext.cmds.is_empty() {
                writeln!(dest, "\tload_gl_{}(load);", ext.name)?;
            }
        }
        writeln!(dest, "\n\treturn glv;\n}}\n")?;

        writeln!(dest, "private:\n")?;

        writeln!(dest, "GLVersion find_core() {{")?;
        writeln!(dest, "\tint major;")?;
        writeln!(dest, "\tint minor;")?;
        writeln!(dest, "\tglGetIntegerv(0x{:04X}, &major);", GL_MAJOR_VERSION)?;
        writeln!(dest, "\tglGetIntegerv(0x{:04X}, &minor);", GL_MINOR_VERSION)?;
        for feature in &protocol.features {
            writeln!(
                dest,
                "\t{name} = (major == {maj} && minor >= {min}) || major > {maj};",
                name = feature.name,
                maj = feature.number.0,
                min = feature.number.1,
            )?;
        }
        writeln!(dest, "\tGLVersion glv; glv.major = major; glv.minor = minor; return glv;")?;
        writeln!(dest, "}}\n")?;

        writeln!(dest, "void find_extensions() {{")?;
        writeln!(
            dest,
            "\tconst(char)* extensions = cast(const(char)*)glGetString(0x{:04X});\n",
            GL_EXTENSIONS
        )?;
        for ext in &protocol.extensions {
            writeln!(dest, "\t{0} = has_ext(extensions, \"{0}\\0\".ptr);", ext.name)?;
        }
        writeln!(dest, "}}\n")?;

        writeln!(dest, "bool has_ext(const(char)* extensions, const(char)* name) {{")?;
        writeln!(dest, "\timport core.stdc.string : strlen, strstr;\n")?;
        writeln!(dest, "\tif(extensions is null || name is null) return false;\n")?;
        writeln!(dest, "\tauto len = strlen(name);")?;
        writeln!(dest, "\tauto loc = strstr(extensions, name);")?;
        writeln!(dest, "\twhile(loc !is null) {{")?;
        writeln!(dest, "\t\tauto terminator = loc + len;")?;
        writeln!(
            dest,
            "\t\tif((loc is extensions || *(loc - 1) == ' ') && (*terminator == ' ' || *terminator == '\\0')) return true;"
        )?;
        writeln!(dest, "\t\tloc = strstr(terminator, name);")?;
        writeln!(dest, "\t}}")?;
        writeln!(dest, "\treturn false;")?;
        writeln!(dest, "}}\n")?;

        for feature in &protocol.features {
            writeln!(dest, "void load_gl_{}(void* function(const(char)* name) load) {{", feature.name)?;
            writeln!(dest, "\tif(!{}) return;", feature.name)?;
            for cmd in &feature.cmds {
                writeln!(dest, "\t{name} = cast(typeof({name}))load(\"{name}\\0\".ptr);", name = cmd)?;
            }
            writeln!(dest, "\treturn;\n}}\n")?;
        }

        for ext in &protocol.extensions {
            if ext.cmds.is_empty() {
                continue;
            }
            writeln!(dest, "bool load_gl_{}(void* function(const(char)* name) load) {{", ext.name)?;
            writeln!(dest, "\tif(!{0}) return {0};\n", ext.name)?;
            // even if core already loaded a command we need to re-resolve it
            for cmd in &ext.cmds {
                writeln!(dest, "\t{name} = cast(typeof({name}))load(\"{name}\\0\".ptr);", name = cmd)?;
            }
            writeln!(dest, "\treturn {};", ext.name)?;
            writeln!(dest, "}}\n")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use crate::spec::{Api, Binding, Cmd, Enum, Extension, Feature, Profile, Spec};

    fn sample_spec() -> Spec {
        let mut spec = Spec::new();
        spec.alias("GLenum", "uint32");
        spec.alias("GLubyte", "uint8");
        spec.alias("GLint", "int32");
        spec.opaque("__GLsync");
        spec.alias("GLsync", "__GLsync*");

        let mut v1 = Feature::new(Api::Gl, "GL_VERSION_1_0", (1, 0));
        v1.enums.push(Enum::new("GL_TRIANGLES", "0x0004"));
        v1.cmds.push(Cmd::new(
            "glGetString",
            "const GLubyte*",
            vec![Binding::new("name", "GLenum")],
        ));
        v1.cmds.push(Cmd::new(
            "glGetIntegerv",
            "void",
            vec![Binding::new("pname", "GLenum"), Binding::new("data", "GLint*")],
        ));
        spec.add_feature(v1);

        let mut v2 = Feature::new(Api::Gl, "GL_VERSION_2_0", (2, 0));
        v2.enums.push(Enum::new("GL_FRAGMENT_SHADER", "0x8B30"));
        v2.cmds.push(Cmd::new("glCreateShader", "GLenum", vec![Binding::new("type", "GLenum")]));
        spec.add_feature(v2);

        let mut ext = Extension::new("GL_EXT_framebuffer_object");
        ext.cmds.push(Cmd::new(
            "glBindFramebufferEXT",
            "void",
            vec![Binding::new("target", "GLenum"), Binding::new("framebuffer", "GLenum")],
        ));
        spec.add_extension(Api::Gl, ext);

        spec
    }

    fn render() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DWriter::new(dir.path(), "gl").unwrap();
        generate(&sample_spec(), Api::Gl, None, Profile::Core, None, &mut writer).unwrap();
        dir
    }

    fn read(dir: &tempfile::TempDir, file: &str) -> String {
        std::fs::read_to_string(dir.path().join(file)).unwrap()
    }

    #[test]
    fn emits_one_artifact_per_module() {
        let dir = render();
        for file in ["types.d", "enums.d", "funcs.d", "ext.d", "loader.d"] {
            assert!(dir.path().join(file).is_file(), "missing {}", file);
        }
    }

    #[test]
    fn types_module_holds_aliases_and_opaque_structs() {
        let dir = render();
        let types = read(&dir, "types.d");
        assert!(types.starts_with("module gl.types;"));
        assert!(types.contains("alias uint GLenum;"));
        assert!(types.contains("struct __GLsync;"));
        assert!(types.contains("alias __GLsync* GLsync;"));
    }

    #[test]
    fn funcs_module_groups_prototypes_and_storage() {
        let dir = render();
        let funcs = read(&dir, "funcs.d");
        assert!(funcs.contains("__gshared bool GL_VERSION_1_0;"));
        assert!(funcs.contains("extern(System) @nogc nothrow {"));
        assert!(funcs.contains("alias const(GLubyte)* function(GLenum name) fp_glGetString;"));
        assert!(funcs.contains("alias GLenum function(GLenum type) fp_glCreateShader;"));
        assert!(funcs.contains("__gshared {"));
        assert!(funcs.contains("\tfp_glGetString glGetString;"));
    }

    #[test]
    fn loader_module_renders_the_probe_sequence() {
        let dir = render();
        let loader = read(&dir, "loader.d");
        assert!(loader.contains("GLVersion loadGl(void* function(const(char)* name) load) {"));
        assert!(loader.contains("if(glGetString is null || glGetIntegerv is null)"));
        assert!(loader.contains("glGetIntegerv(0x821B, &major);"));
        assert!(loader.contains("GL_VERSION_2_0 = (major == 2 && minor >= 0) || major > 2;"));
        assert!(loader.contains(
            "GL_EXT_framebuffer_object = has_ext(extensions, \"GL_EXT_framebuffer_object\\0\".ptr);"
        ));
        assert!(loader.contains("bool load_gl_GL_EXT_framebuffer_object"));
    }

    #[test]
    fn enum_width_hints_map_to_d_types() {
        let dir = render();
        let enums = read(&dir, "enums.d");
        assert!(enums.contains("enum ubyte GL_FALSE = 0;"));
        assert!(enums.contains("enum ulong GL_TIMEOUT_IGNORED = 0xFFFFFFFFFFFFFFFF;"));
        assert!(enums.contains("enum uint GL_TRIANGLES = 0x0004;"));
    }
}
