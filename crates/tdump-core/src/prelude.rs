//! Common module for library exports

pub use crate::document::{Difference, Document, Map};
pub use crate::dump::{compare_namespaces, dump, dump_namespace, Dumper, SKIP_ABI_PLACEHOLDER};
pub use crate::error::{DumpError, DumpResult};
pub use crate::graph::{InfoRef, NodeId, NodeSpec, Typelib, TypelibBuilder};
pub use crate::info::*;
pub use crate::options::DumpOptions;
