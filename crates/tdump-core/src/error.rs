//! # Error Types
//!
//! Errors raised while walking a metadata graph.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::graph::NodeId;
use crate::info::InfoType;

/// Main error type for dump operations
///
/// Every variant aborts the dump it occurs in: a document that skipped a node
/// would make any equivalence claim about the rest of it meaningless.
///
/// ## Error Categories
///
/// 1. **Contract errors**: `MissingChild`, `UnknownVariant`, `AttrsMismatch`
/// 2. **Graph errors**: `InvalidNode`, `UnexpectedTarget` (in-memory typelib only)
/// 3. **Encoding errors**: `Serialization`
#[derive(Error, Debug)]
pub enum DumpError
{
    /// A child collection or reference was requested from a kind that does
    /// not define it.
    ///
    /// The dump engine only asks for what a kind owns, so seeing this from a
    /// dump means a backend reports a kind inconsistent with its projection.
    #[error("{info_type} node has no '{child}' collection or reference")]
    MissingChild
    {
        /// Kind of the node that was asked
        info_type: InfoType,
        /// Collection or reference key that was requested
        child: String,
    },

    /// The graph contains a node kind (or a raw table value) this crate
    /// cannot represent.
    ///
    /// This is fatal: the metadata schema has grown beyond what the dumper
    /// covers.
    #[error("unknown typelib variant: {0}")]
    UnknownVariant(String),

    /// A node id does not exist in the typelib it was used with.
    #[error("node {0} does not exist")]
    InvalidNode(NodeId),

    /// A node's attribute projection does not fit its kind.
    ///
    /// Raised by the typelib builder and loader, and by the dump engine when a
    /// backend hands it such a node.
    #[error("node of kind {info_type} cannot carry {tag} attributes")]
    AttrsMismatch
    {
        /// Kind the node was declared with
        info_type: InfoType,
        /// Projection it was given
        tag: &'static str,
    },

    /// A collection entry or reference points at a node of the wrong kind.
    #[error("{info_type} node's '{child}' cannot point at a {target} node")]
    UnexpectedTarget
    {
        /// Kind of the node holding the collection or reference
        info_type: InfoType,
        /// Collection or reference key
        child: String,
        /// Kind of the node it points at
        target: InfoType,
    },

    /// Encoding a document or decoding a typelib blob failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for `Result<T, DumpError>`
///
/// ```rust
/// use tdump_core::error::DumpResult;
/// fn foo() -> DumpResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type DumpResult<T> = std::result::Result<T, DumpError>;
