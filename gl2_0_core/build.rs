////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use gl_bindgen::{generate, Api, Binding, Cmd, Enum, Extension, Feature, Profile, RustWriter, Spec};
use std::{env, fs::File, path::Path};

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let mut file = File::create(Path::new(&out_dir).join("bindings.rs"))
        .expect("Could not create bindings file");

    let mut writer = RustWriter::new(&mut file);
    generate(&spec(), Api::Gl, None, Profile::Core, None, &mut writer)
        .expect("bindings generation failed");

    println!("cargo:rerun-if-changed=build.rs");
}

fn cmd(name: &str, ret: &str, params: &[(&str, &str)]) -> Cmd {
    Cmd::new(name, ret, params.iter().map(|&(ident, ty)| Binding::new(ident, ty)).collect())
}

/// A hand-maintained subset of the GL registry up to 2.0 core, stated the
/// same way a registry parser would.
fn spec() -> Spec {
    let mut spec = Spec::new();

    spec.alias("GLenum", "uint32");
    spec.alias("GLboolean", "uint8");
    spec.alias("GLbitfield", "uint32");
    spec.alias("GLbyte", "int8");
    spec.alias("GLubyte", "uint8");
    spec.alias("GLshort", "int16");
    spec.alias("GLushort", "uint16");
    spec.alias("GLint", "int32");
    spec.alias("GLuint", "uint32");
    spec.alias("GLsizei", "int32");
    spec.alias("GLfloat", "float32");
    spec.alias("GLdouble", "float64");
    spec.alias("GLchar", "char8");
    spec.alias("GLintptr", "intptr");
    spec.alias("GLsizeiptr", "sizeiptr");
    spec.opaque("__GLsync");
    spec.alias("GLsync", "__GLsync*");
    spec.alias("GLDEBUGPROC", "void*");

    let mut v1_0 = Feature::new(Api::Gl, "GL_VERSION_1_0", (1, 0));
    v1_0.enums.push(Enum::new("GL_FALSE", "0").with_group("SpecialNumbers"));
    v1_0.enums.push(Enum::new("GL_TRUE", "1").with_group("SpecialNumbers"));
    v1_0.enums.push(Enum::new("GL_DEPTH_BUFFER_BIT", "0x00000100"));
    v1_0.enums.push(Enum::new("GL_COLOR_BUFFER_BIT", "0x00004000"));
    v1_0.enums.push(Enum::new("GL_TRIANGLES", "0x0004"));
    v1_0.enums.push(Enum::new("GL_ACCUM", "0x0100"));
    v1_0.enums.push(Enum::new("GL_VENDOR", "0x1F00"));
    v1_0.enums.push(Enum::new("GL_RENDERER", "0x1F01"));
    v1_0.enums.push(Enum::new("GL_VERSION", "0x1F02"));
    v1_0.enums.push(Enum::new("GL_EXTENSIONS", "0x1F03"));
    v1_0.cmds.push(cmd("glGetString", "const GLubyte*", &[("name", "GLenum")]));
    v1_0.cmds.push(cmd("glGetIntegerv", "void", &[("pname", "GLenum"), ("data", "GLint*")]));
    v1_0.cmds.push(cmd("glClear", "void", &[("mask", "GLbitfield")]));
    v1_0.cmds.push(cmd("glEnable", "void", &[("cap", "GLenum")]));
    v1_0.cmds.push(cmd("glDisable", "void", &[("cap", "GLenum")]));
    v1_0.cmds.push(cmd("glAccum", "void", &[("op", "GLenum"), ("value", "GLfloat")]));
    spec.add_feature(v1_0);

    let mut v1_1 = Feature::new(Api::Gl, "GL_VERSION_1_1", (1, 1));
    v1_1.enums.push(Enum::new("GL_RGBA8", "0x8058"));
    v1_1.cmds.push(cmd("glBindTexture", "void", &[("target", "GLenum"), ("texture", "GLuint")]));
    v1_1.cmds.push(cmd("glGenTextures", "void", &[("n", "GLsizei"), ("textures", "GLuint*")]));
    v1_1.cmds
        .push(cmd("glDeleteTextures", "void", &[("n", "GLsizei"), ("textures", "const GLuint*")]));
    spec.add_feature(v1_1);

    let mut v2_0 = Feature::new(Api::Gl, "GL_VERSION_2_0", (2, 0));
    v2_0.enums.push(Enum::new("GL_FRAGMENT_SHADER", "0x8B30"));
    v2_0.enums.push(Enum::new("GL_VERTEX_SHADER", "0x8B31"));
    v2_0.cmds.push(cmd("glCreateShader", "GLuint", &[("type", "GLenum")]));
    v2_0.cmds.push(cmd("glCompileShader", "void", &[("shader", "GLuint")]));
    v2_0.cmds.push(cmd("glAttachShader", "void", &[("program", "GLuint"), ("shader", "GLuint")]));
    // 2.0 core drops the accumulation buffer
    v2_0.removed.push("glAccum".to_owned());
    v2_0.removed.push("GL_ACCUM".to_owned());
    spec.add_feature(v2_0);

    let mut anisotropic = Extension::new("GL_EXT_texture_filter_anisotropic");
    anisotropic.enums.push(Enum::new("GL_TEXTURE_MAX_ANISOTROPY_EXT", "0x84FE"));
    anisotropic.enums.push(Enum::new("GL_MAX_TEXTURE_MAX_ANISOTROPY_EXT", "0x84FF"));
    spec.add_extension(Api::Gl, anisotropic);

    let mut fbo = Extension::new("GL_EXT_framebuffer_object");
    fbo.enums.push(Enum::new("GL_FRAMEBUFFER_EXT", "0x8D40"));
    fbo.cmds.push(cmd(
        "glBindFramebufferEXT",
        "void",
        &[("target", "GLenum"), ("framebuffer", "GLuint")],
    ));
    fbo.cmds.push(cmd(
        "glGenFramebuffersEXT",
        "void",
        &[("n", "GLsizei"), ("framebuffers", "GLuint*")],
    ));
    spec.add_extension(Api::Gl, fbo);

    let mut debug = Extension::new("GL_KHR_debug");
    debug.enums.push(Enum::new("GL_DEBUG_OUTPUT", "0x92E0"));
    debug.cmds.push(cmd(
        "glDebugMessageCallback",
        "void",
        &[("callback", "GLDEBUGPROC"), ("userParam", "const void*")],
    ));
    spec.add_extension(Api::Gl, debug);

    spec
}
