////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! A bindings generator for versioned, extensible graphics APIs.
//!
//! Given an in-memory [`Spec`] (ordered features per api, extension tables,
//! type aliases), [`generate`] resolves which symbols are visible for a
//! requested `(api, version, profile)` triple and emits four artifacts
//! through a pluggable [`Writer`]: the type aliases, the merged enums and
//! functions, the extension deltas, and a runtime loader that probes a live
//! driver (version, advertised extensions) before resolving any function
//! pointer.
//!
//! # Example
//!
//! In `build.rs` of a bindings crate:
//!
//! ```no_run
//! use gl_bindgen::{generate, Api, Profile, RustWriter, Spec};
//! use std::{env, fs::File, path::Path};
//!
//! fn main() {
//!     let spec: Spec = build_spec(); // from a registry parser, or by hand
//!     let out_dir = env::var("OUT_DIR").unwrap();
//!     let mut file = File::create(Path::new(&out_dir).join("bindings.rs")).unwrap();
//!
//!     let mut writer = RustWriter::new(&mut file);
//!     generate(&spec, Api::Gl, Some((4, 6)), Profile::Core, None, &mut writer).unwrap();
//! }
//! # fn build_spec() -> Spec { Spec::new() }
//! ```
//!
//! In the bindings crate:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
//! ```
//!
//! The generated loader is single-threaded by contract: run
//! `Gl::load` to completion before reading any pointer slot from
//! another thread.

pub mod error;
pub mod ext;
pub mod loader;
pub mod merge;
pub mod spec;
pub mod writers;

mod generate;

pub use error::Error;
pub use generate::generate;
pub use loader::{ExtensionLoad, FeatureLoad, LoaderProtocol};
pub use merge::{merge, ResolvedSymbolSet};
pub use spec::{Api, Binding, Cmd, Enum, Extension, Feature, Profile, Spec, TypeDef, Version};
pub use writers::{DWriter, Module, RustWriter, Writer};
