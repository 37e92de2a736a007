//! # tdump-core
//!
//! Canonical dumps of typelib introspection metadata.
//!
//! A typelib is a binary blob describing a type system: namespaces,
//! functions, objects, interfaces, structs, unions, enums and everything
//! hanging off them. This crate walks such a metadata graph through the
//! [`InfoHandle`] trait and turns it into a deterministic [`Document`], so
//! that two independently written readers of the same typelib can be checked
//! for equivalence and benchmarked on identical work.
//!
//! ## Layout
//!
//! - [`info`]: the handle trait, the closed set of node kinds, and per-kind
//!   attribute projections
//! - [`dump`]: the canonical dump engine
//! - [`document`]: the output value, its serialization and diffing
//! - [`graph`]: an in-memory typelib backend
//! - [`options`]: dump configuration
//!
//! ## Example
//!
//! ```rust
//! use tdump_core::graph::{NodeSpec, TypelibBuilder};
//! use tdump_core::info::{Attrs, InfoType, StructAttrs};
//! use tdump_core::{dump, SKIP_ABI_PLACEHOLDER};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>>
//! {
//!     let mut builder = TypelibBuilder::new("Demo");
//!     let rect = builder.add(NodeSpec::new(InfoType::Struct, "Rect", Attrs::Struct {
//!         registered: Default::default(),
//!         layout: StructAttrs { size: 24, alignment: 8, ..Default::default() },
//!     }))?;
//!     builder.add_root(rect)?;
//!     let typelib = builder.build()?;
//!     let info = typelib.find("Rect");
//!
//!     let native = dump(info.as_ref(), false, false)?;
//!     assert_eq!(native.get("size").and_then(|d| d.as_int()), Some(24));
//!
//!     let portable = dump(info.as_ref(), true, false)?;
//!     assert_eq!(portable.get("size").and_then(|d| d.as_str()), Some(SKIP_ABI_PLACEHOLDER));
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod dump;
pub mod error;
pub mod graph;
pub mod info;
pub mod options;
pub mod prelude;

pub use document::{Difference, Document};
pub use dump::{compare_namespaces, dump, dump_namespace, Dumper, SKIP_ABI_PLACEHOLDER};
pub use error::{DumpError, DumpResult};
pub use info::{Attrs, Collection, InfoHandle, InfoType, Link};
pub use options::DumpOptions;
