//! OpenGL 2.0 core bindings generated by `build.rs`.
//!
//! The interesting surface is the [`Gl`] state struct: `Gl::load` probes the
//! driver through a resolve callback and fills in capability flags and
//! function pointer slots; everything else is constants and type aliases.

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
