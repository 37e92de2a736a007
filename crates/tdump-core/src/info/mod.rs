//! # Info Handles
//!
//! The read-only view of one node in a typelib's metadata graph.
//!
//! Two readers of the same typelib (say, one going through a C binding layer
//! and one through a foreign-function layer) expose their nodes through
//! [`InfoHandle`]. The dump engine only talks to this trait, so it produces
//! the same document for both as long as they report the same content.
//!
//! A handle answers four questions:
//!
//! 1. Its primary kind ([`InfoHandle::info_type`])
//! 2. Its specialization and scalar fields ([`InfoHandle::attrs`])
//! 3. Its ordered child collections ([`InfoHandle::children`])
//! 4. Its single-node references ([`InfoHandle::link`])
//!
//! Asking a node for a collection or reference its kind does not define is a
//! contract violation reported as [`DumpError::MissingChild`].

pub mod attrs;
pub mod flags;
pub mod kinds;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use attrs::{
    ArgAttrs, Attrs, CallableAttrs, EnumAttrs, FieldAttrs, ObjectAttrs, PropertyAttrs, RegisteredTypeAttrs,
    StructAttrs, TypeAttrs, UnionAttrs,
};
pub use flags::{render_flags, FieldFlags, FunctionFlags, PropertyFlags, SignalFlags, VFuncFlags};
pub use kinds::{ArrayType, Direction, InfoType, ScopeType, Transfer, TypeTag};

use crate::error::{DumpError, DumpResult};

/// Ordered child collections a node may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection
{
    Args,
    Values,
    Prerequisites,
    Properties,
    Methods,
    Signals,
    #[serde(rename = "vfuncs")]
    VFuncs,
    Constants,
    Fields,
    Interfaces,
}

impl Collection
{
    pub const ALL: [Collection; 10] = [
        Collection::Args,
        Collection::Values,
        Collection::Prerequisites,
        Collection::Properties,
        Collection::Methods,
        Collection::Signals,
        Collection::VFuncs,
        Collection::Constants,
        Collection::Fields,
        Collection::Interfaces,
    ];

    /// Key under which the collection appears in a dump.
    #[must_use]
    pub fn key(self) -> &'static str
    {
        match self {
            Collection::Args => "args",
            Collection::Values => "values",
            Collection::Prerequisites => "prerequisites",
            Collection::Properties => "properties",
            Collection::Methods => "methods",
            Collection::Signals => "signals",
            Collection::VFuncs => "vfuncs",
            Collection::Constants => "constants",
            Collection::Fields => "fields",
            Collection::Interfaces => "interfaces",
        }
    }

    /// Whether nodes of `info_type` own this collection.
    #[must_use]
    pub fn defined_for(self, info_type: InfoType) -> bool
    {
        use InfoType as T;
        match self {
            Collection::Args => info_type.is_callable(),
            Collection::Values => matches!(info_type, T::Enum | T::Flags),
            Collection::Prerequisites => info_type == T::Interface,
            Collection::Properties | Collection::Signals | Collection::VFuncs | Collection::Constants => {
                matches!(info_type, T::Interface | T::Object)
            }
            Collection::Methods => matches!(
                info_type,
                T::Interface | T::Object | T::Struct | T::Union | T::Enum | T::Flags
            ),
            Collection::Fields => matches!(info_type, T::Object | T::Struct | T::Union),
            Collection::Interfaces => info_type == T::Object,
        }
    }

    /// Whether a node of kind `child` may be listed in this collection.
    #[must_use]
    pub fn accepts(self, child: InfoType) -> bool
    {
        use InfoType as T;
        match self {
            Collection::Args => child == T::Arg,
            Collection::Values => child == T::Value,
            Collection::Prerequisites => matches!(child, T::Interface | T::Object | T::Unresolved),
            Collection::Properties => child == T::Property,
            Collection::Methods => child == T::Function,
            Collection::Signals => child == T::Signal,
            Collection::VFuncs => child == T::VFunc,
            Collection::Constants => child == T::Constant,
            Collection::Fields => child == T::Field,
            Collection::Interfaces => matches!(child, T::Interface | T::Unresolved),
        }
    }
}

impl fmt::Display for Collection
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.key())
    }
}

/// Single-node references a node may hold. Any of them may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link
{
    /// Return type of a callable.
    ReturnType,
    /// Class closure of a signal.
    ClassClosure,
    /// Signal a vfunc is the default handler of.
    Signal,
    /// Method that invokes a vfunc.
    Invoker,
    /// Interface vtable struct.
    IfaceStruct,
    /// Object class struct.
    ClassStruct,
    DiscriminatorType,
    /// Type of an arg, constant, field or property.
    Type,
    /// Registered type a type reference points at.
    Interface,
}

impl Link
{
    pub const ALL: [Link; 9] = [
        Link::ReturnType,
        Link::ClassClosure,
        Link::Signal,
        Link::Invoker,
        Link::IfaceStruct,
        Link::ClassStruct,
        Link::DiscriminatorType,
        Link::Type,
        Link::Interface,
    ];

    /// Key under which the reference appears in a dump.
    #[must_use]
    pub fn key(self) -> &'static str
    {
        match self {
            Link::ReturnType => "return_type",
            Link::ClassClosure => "class_closure",
            Link::Signal => "signal",
            Link::Invoker => "invoker",
            Link::IfaceStruct => "iface_struct",
            Link::ClassStruct => "class_struct",
            Link::DiscriminatorType => "discriminator_type",
            Link::Type => "type",
            Link::Interface => "interface",
        }
    }

    /// Whether nodes of `info_type` hold this reference.
    #[must_use]
    pub fn defined_for(self, info_type: InfoType) -> bool
    {
        use InfoType as T;
        match self {
            Link::ReturnType => info_type.is_callable(),
            Link::ClassClosure => info_type == T::Signal,
            Link::Signal | Link::Invoker => info_type == T::VFunc,
            Link::IfaceStruct => info_type == T::Interface,
            Link::ClassStruct => info_type == T::Object,
            Link::DiscriminatorType => info_type == T::Union,
            Link::Type => matches!(info_type, T::Arg | T::Constant | T::Field | T::Property),
            Link::Interface => info_type == T::Type,
        }
    }

    /// Whether a node of kind `target` may be the target of this reference.
    ///
    /// Full-depth references only ever lead to kinds that cannot refer back
    /// at full depth, which keeps every dump finite.
    #[must_use]
    pub fn accepts(self, target: InfoType) -> bool
    {
        use InfoType as T;
        match self {
            Link::ReturnType | Link::DiscriminatorType | Link::Type => target == T::Type,
            Link::ClassClosure => target == T::VFunc,
            Link::Signal => target == T::Signal,
            Link::Invoker => target == T::Function,
            Link::IfaceStruct | Link::ClassStruct => target == T::Struct,
            Link::Interface => target.is_registered_type() || matches!(target, T::Callback | T::Unresolved),
        }
    }
}

impl fmt::Display for Link
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.key())
    }
}

/// Read-only handle to one metadata node.
///
/// Implementations borrow from a backing typelib that outlives every dump;
/// none of these methods may mutate it. Child handles are returned in
/// whatever order the backend stores them; the dump engine sorts them.
pub trait InfoHandle: Sized
{
    /// Primary kind of the node.
    fn info_type(&self) -> InfoType;

    /// Namespace the node belongs to.
    fn namespace(&self) -> &str;

    /// Short name. Type nodes and some anonymous members have none.
    fn name(&self) -> Option<&str>;

    /// Whether the node is marked deprecated.
    fn is_deprecated(&self) -> bool;

    /// Custom `name=value` annotations, in declaration order.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Specialization and scalar fields.
    fn attrs(&self) -> Attrs;

    /// Children in `collection`.
    ///
    /// ## Errors
    ///
    /// [`DumpError::MissingChild`] if the node's kind does not own `collection`.
    fn children(&self, collection: Collection) -> DumpResult<Vec<Self>>;

    /// Target of `link`, `None` when the reference is unset.
    ///
    /// ## Errors
    ///
    /// [`DumpError::MissingChild`] if the node's kind does not hold `link`.
    fn link(&self, link: Link) -> DumpResult<Option<Self>>;
}

/// Build the error a handle reports for an undefined collection or reference.
pub fn missing_child(info_type: InfoType, child: impl fmt::Display) -> DumpError
{
    DumpError::MissingChild {
        info_type,
        child: child.to_string(),
    }
}

/// Build the error for a collection entry or reference of the wrong kind.
pub fn unexpected_target(info_type: InfoType, child: impl fmt::Display, target: InfoType) -> DumpError
{
    DumpError::UnexpectedTarget {
        info_type,
        child: child.to_string(),
        target,
    }
}
