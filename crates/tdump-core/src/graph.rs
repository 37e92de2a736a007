//! # In-Memory Typelib
//!
//! An arena-backed metadata graph that implements [`InfoHandle`].
//!
//! Nodes live in one vector and refer to each other by [`NodeId`], the same
//! way the binary format refers to entries by blob offset. Handles are a
//! `(typelib, id)` pair and borrow the typelib, so they are `Copy` and the
//! graph stays read-only for as long as any dump is running.
//!
//! A [`Typelib`] is always valid: [`TypelibBuilder::build`],
//! [`Typelib::from_slice`] and every other deserialization path reject
//! dangling ids, kinds outside the known table, projections that do not fit
//! their kind, collections or references a kind does not define, and entries
//! or targets of the wrong kind. A valid typelib always dumps in finite depth.
//!
//! ## Usage
//!
//! ```rust
//! use tdump_core::graph::{NodeSpec, TypelibBuilder};
//! use tdump_core::info::{Attrs, Collection, InfoType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>>
//! {
//!     let mut builder = TypelibBuilder::new("Demo");
//!     let color = builder.add(NodeSpec::new(InfoType::Enum, "Color", Attrs::Enum {
//!         registered: Default::default(),
//!         enumeration: Default::default(),
//!     }))?;
//!     let red = builder.add(NodeSpec::new(InfoType::Value, "red", Attrs::Value { value: 0 }))?;
//!     builder.push_child(color, Collection::Values, red)?;
//!     builder.add_root(color)?;
//!
//!     let typelib = builder.build()?;
//!     let bytes = typelib.to_vec()?;
//!     let reloaded = tdump_core::graph::Typelib::from_slice(&bytes)?;
//!     assert_eq!(reloaded.infos().len(), 1);
//!     Ok(())
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DumpError, DumpResult};
use crate::info::{missing_child, unexpected_target, Attrs, Collection, InfoHandle, InfoType, Link};

/// Index of a node inside its [`Typelib`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId
{
    #[must_use]
    pub fn index(self) -> usize
    {
        self.0 as usize
    }
}

impl From<u32> for NodeId
{
    fn from(value: u32) -> Self
    {
        NodeId(value)
    }
}

impl fmt::Display for NodeId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// Description of a node to add with [`TypelibBuilder::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec
{
    info_type: InfoType,
    namespace: Option<String>,
    name: Option<String>,
    deprecated: bool,
    attributes: Vec<(String, String)>,
    attrs: Attrs,
}

impl NodeSpec
{
    /// A named node in the typelib's own namespace.
    pub fn new(info_type: InfoType, name: impl Into<String>, attrs: Attrs) -> Self
    {
        Self {
            name: Some(name.into()),
            ..Self::anonymous(info_type, attrs)
        }
    }

    /// A node without a name, such as a type reference.
    #[must_use]
    pub fn anonymous(info_type: InfoType, attrs: Attrs) -> Self
    {
        Self {
            info_type,
            namespace: None,
            name: None,
            deprecated: false,
            attributes: Vec::new(),
            attrs,
        }
    }

    /// Place the node in another namespace (a cross-namespace reference).
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self
    {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, deprecated: bool) -> Self
    {
        self.deprecated = deprecated;
        self
    }

    /// Append a custom `name=value` annotation.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self
    {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Node
{
    info_type: InfoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    name: Option<String>,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    attributes: Vec<(String, String)>,
    attrs: Attrs,
    #[serde(default)]
    children: Vec<(Collection, Vec<NodeId>)>,
    #[serde(default)]
    links: Vec<(Link, NodeId)>,
}

impl From<NodeSpec> for Node
{
    fn from(spec: NodeSpec) -> Self
    {
        Self {
            info_type: spec.info_type,
            namespace: spec.namespace,
            name: spec.name,
            deprecated: spec.deprecated,
            attributes: spec.attributes,
            attrs: spec.attrs,
            children: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// A node as stored in a blob, before its kind is checked against the table.
#[derive(Deserialize)]
struct RawNode
{
    info_type: u32,
    #[serde(default)]
    namespace: Option<String>,
    name: Option<String>,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    attributes: Vec<(String, String)>,
    attrs: Attrs,
    #[serde(default)]
    children: Vec<(Collection, Vec<NodeId>)>,
    #[serde(default)]
    links: Vec<(Link, NodeId)>,
}

impl TryFrom<RawNode> for Node
{
    type Error = DumpError;

    fn try_from(raw: RawNode) -> DumpResult<Self>
    {
        Ok(Self {
            info_type: InfoType::try_from(raw.info_type)?,
            namespace: raw.namespace,
            name: raw.name,
            deprecated: raw.deprecated,
            attributes: raw.attributes,
            attrs: raw.attrs,
            children: raw.children,
            links: raw.links,
        })
    }
}

#[derive(Deserialize)]
struct RawTypelib
{
    namespace: String,
    nodes: Vec<RawNode>,
    roots: Vec<NodeId>,
}

impl TryFrom<RawTypelib> for Typelib
{
    type Error = DumpError;

    fn try_from(raw: RawTypelib) -> DumpResult<Self>
    {
        let typelib = Typelib {
            namespace: raw.namespace,
            nodes: raw.nodes.into_iter().map(Node::try_from).collect::<DumpResult<_>>()?,
            roots: raw.roots,
        };
        typelib.validate()?;
        Ok(typelib)
    }
}

/// A loaded namespace: its nodes and the ids of its top-level entries.
///
/// Deserializing goes through the same checks as [`Typelib::from_slice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTypelib")]
pub struct Typelib
{
    namespace: String,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Typelib
{
    /// Load a typelib from its serialized blob.
    ///
    /// ## Errors
    ///
    /// - [`DumpError::Serialization`] if the bytes do not decode, including
    ///   tag numbers outside the known tables inside a projection
    /// - [`DumpError::UnknownVariant`] if a node's kind is outside the table
    /// - [`DumpError::InvalidNode`], [`DumpError::AttrsMismatch`],
    ///   [`DumpError::MissingChild`] or [`DumpError::UnexpectedTarget`] if the
    ///   decoded graph is inconsistent
    pub fn from_slice(bytes: &[u8]) -> DumpResult<Self>
    {
        let raw: RawTypelib = serde_json::from_slice(bytes)?;
        let typelib = Typelib::try_from(raw)?;
        tracing::debug!(
            namespace = %typelib.namespace,
            nodes = typelib.nodes.len(),
            roots = typelib.roots.len(),
            "loaded typelib"
        );
        Ok(typelib)
    }

    /// Serialize the typelib into a blob accepted by [`Typelib::from_slice`].
    ///
    /// ## Errors
    ///
    /// Returns [`DumpError::Serialization`] if encoding fails.
    pub fn to_vec(&self) -> DumpResult<Vec<u8>>
    {
        Ok(serde_json::to_vec(self)?)
    }

    #[must_use]
    pub fn namespace(&self) -> &str
    {
        &self.namespace
    }

    /// Number of nodes, including nested ones.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.nodes.is_empty()
    }

    /// Handles to the namespace's top-level entries, in declaration order.
    #[must_use]
    pub fn infos(&self) -> Vec<InfoRef<'_>>
    {
        self.roots.iter().map(|&id| InfoRef { typelib: self, id }).collect()
    }

    /// Handle to any node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<InfoRef<'_>>
    {
        (id.index() < self.nodes.len()).then_some(InfoRef { typelib: self, id })
    }

    /// Top-level entry by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<InfoRef<'_>>
    {
        self.infos().into_iter().find(|info| info.name() == Some(name))
    }

    fn check_id(&self, id: NodeId) -> DumpResult<()>
    {
        self.kind_of(id).map(|_| ())
    }

    fn kind_of(&self, id: NodeId) -> DumpResult<InfoType>
    {
        self.nodes
            .get(id.index())
            .map(|node| node.info_type)
            .ok_or(DumpError::InvalidNode(id))
    }

    fn validate(&self) -> DumpResult<()>
    {
        for &root in &self.roots {
            self.check_id(root)?;
        }
        for node in &self.nodes {
            if !node.attrs.accepts(node.info_type) {
                return Err(DumpError::AttrsMismatch {
                    info_type: node.info_type,
                    tag: node.attrs.tag(),
                });
            }
            for (collection, ids) in &node.children {
                if !collection.defined_for(node.info_type) {
                    return Err(missing_child(node.info_type, collection));
                }
                for &id in ids {
                    let child = self.kind_of(id)?;
                    if !collection.accepts(child) {
                        return Err(unexpected_target(node.info_type, collection, child));
                    }
                }
            }
            for &(link, id) in &node.links {
                if !link.defined_for(node.info_type) {
                    return Err(missing_child(node.info_type, link));
                }
                let target = self.kind_of(id)?;
                if !link.accepts(target) {
                    return Err(unexpected_target(node.info_type, link, target));
                }
            }
        }
        Ok(())
    }
}

/// Incremental construction of a [`Typelib`].
#[derive(Debug)]
pub struct TypelibBuilder
{
    typelib: Typelib,
}

impl TypelibBuilder
{
    pub fn new(namespace: impl Into<String>) -> Self
    {
        Self {
            typelib: Typelib {
                namespace: namespace.into(),
                nodes: Vec::new(),
                roots: Vec::new(),
            },
        }
    }

    /// Add a node and return its id.
    ///
    /// ## Errors
    ///
    /// [`DumpError::AttrsMismatch`] if the projection does not fit the kind.
    pub fn add(&mut self, spec: NodeSpec) -> DumpResult<NodeId>
    {
        if !spec.attrs.accepts(spec.info_type) {
            return Err(DumpError::AttrsMismatch {
                info_type: spec.info_type,
                tag: spec.attrs.tag(),
            });
        }
        let raw = u32::try_from(self.typelib.nodes.len()).map_err(|_| DumpError::InvalidNode(NodeId(u32::MAX)))?;
        self.typelib.nodes.push(spec.into());
        Ok(NodeId(raw))
    }

    /// Append `child` to `parent`'s `collection`.
    ///
    /// ## Errors
    ///
    /// - [`DumpError::InvalidNode`] if either id is unknown
    /// - [`DumpError::MissingChild`] if `parent`'s kind does not own `collection`
    /// - [`DumpError::UnexpectedTarget`] if `child`'s kind does not belong in it
    pub fn push_child(&mut self, parent: NodeId, collection: Collection, child: NodeId) -> DumpResult<()>
    {
        let child_kind = self.typelib.kind_of(child)?;
        let node = self.node_mut(parent)?;
        if !collection.defined_for(node.info_type) {
            return Err(missing_child(node.info_type, collection));
        }
        if !collection.accepts(child_kind) {
            return Err(unexpected_target(node.info_type, collection, child_kind));
        }
        match node.children.iter_mut().find(|(existing, _)| *existing == collection) {
            Some((_, ids)) => ids.push(child),
            None => node.children.push((collection, vec![child])),
        }
        Ok(())
    }

    /// Point `parent`'s `link` at `target`, replacing any previous target.
    ///
    /// ## Errors
    ///
    /// - [`DumpError::InvalidNode`] if either id is unknown
    /// - [`DumpError::MissingChild`] if `parent`'s kind does not hold `link`
    /// - [`DumpError::UnexpectedTarget`] if `target`'s kind cannot be referenced by `link`
    pub fn set_link(&mut self, parent: NodeId, link: Link, target: NodeId) -> DumpResult<()>
    {
        let target_kind = self.typelib.kind_of(target)?;
        let node = self.node_mut(parent)?;
        if !link.defined_for(node.info_type) {
            return Err(missing_child(node.info_type, link));
        }
        if !link.accepts(target_kind) {
            return Err(unexpected_target(node.info_type, link, target_kind));
        }
        node.links.retain(|(existing, _)| *existing != link);
        node.links.push((link, target));
        Ok(())
    }

    /// Register `id` as a top-level entry of the namespace.
    ///
    /// ## Errors
    ///
    /// [`DumpError::InvalidNode`] if the id is unknown.
    pub fn add_root(&mut self, id: NodeId) -> DumpResult<()>
    {
        self.typelib.check_id(id)?;
        self.typelib.roots.push(id);
        Ok(())
    }

    /// Finish construction.
    ///
    /// ## Errors
    ///
    /// Same checks as [`Typelib::from_slice`].
    pub fn build(self) -> DumpResult<Typelib>
    {
        self.typelib.validate()?;
        Ok(self.typelib)
    }

    fn node_mut(&mut self, id: NodeId) -> DumpResult<&mut Node>
    {
        self.typelib.nodes.get_mut(id.index()).ok_or(DumpError::InvalidNode(id))
    }
}

/// Handle to one node of a [`Typelib`].
#[derive(Clone, Copy)]
pub struct InfoRef<'a>
{
    typelib: &'a Typelib,
    id: NodeId,
}

impl<'a> InfoRef<'a>
{
    #[must_use]
    pub fn id(&self) -> NodeId
    {
        self.id
    }

    fn node(&self) -> &'a Node
    {
        // Ids are validated when the typelib is built or loaded.
        &self.typelib.nodes[self.id.index()]
    }

    fn at(&self, id: NodeId) -> InfoRef<'a>
    {
        InfoRef {
            typelib: self.typelib,
            id,
        }
    }
}

impl fmt::Debug for InfoRef<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let node = self.node();
        f.debug_struct("InfoRef")
            .field("id", &self.id)
            .field("info_type", &node.info_type)
            .field("name", &node.name)
            .finish()
    }
}

impl InfoHandle for InfoRef<'_>
{
    fn info_type(&self) -> InfoType
    {
        self.node().info_type
    }

    fn namespace(&self) -> &str
    {
        self.node().namespace.as_deref().unwrap_or(self.typelib.namespace.as_str())
    }

    fn name(&self) -> Option<&str>
    {
        self.node().name.as_deref()
    }

    fn is_deprecated(&self) -> bool
    {
        self.node().deprecated
    }

    fn attributes(&self) -> Vec<(&str, &str)>
    {
        self.node()
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    fn attrs(&self) -> Attrs
    {
        self.node().attrs.clone()
    }

    fn children(&self, collection: Collection) -> DumpResult<Vec<Self>>
    {
        let node = self.node();
        if !collection.defined_for(node.info_type) {
            return Err(missing_child(node.info_type, collection));
        }
        Ok(node
            .children
            .iter()
            .find(|(existing, _)| *existing == collection)
            .map(|(_, ids)| ids.iter().map(|&id| self.at(id)).collect())
            .unwrap_or_default())
    }

    fn link(&self, link: Link) -> DumpResult<Option<Self>>
    {
        let node = self.node();
        if !link.defined_for(node.info_type) {
            return Err(missing_child(node.info_type, link));
        }
        Ok(node
            .links
            .iter()
            .find(|(existing, _)| *existing == link)
            .map(|&(_, id)| self.at(id)))
    }
}
