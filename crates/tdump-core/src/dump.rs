//! # Canonical Dump Engine
//!
//! Converts an [`InfoHandle`] graph into a [`Document`].
//!
//! The walk is a recursive descent that returns a finished document from every
//! call. Three rules make its output canonical:
//!
//! - **Fixed field order**: each variant emits its fields in one order.
//! - **Sorted children**: every child collection (and the namespace root list)
//!   is sorted by name before it is emitted. Readers do not agree on
//!   declaration order.
//! - **ABI redaction**: with `skip_abi`, sizes, alignments and offsets become
//!   [`SKIP_ABI_PLACEHOLDER`].
//!
//! Recursion is bounded by `minimal` truncation: references that would lead
//! back into a full type definition (a type's interface, a signal's class
//! closure, a vfunc's invoker, class and interface structs, prerequisites)
//! are dumped with identifying fields only.
//!
//! ## Usage
//!
//! ```rust
//! use tdump_core::graph::{NodeSpec, TypelibBuilder};
//! use tdump_core::info::{Attrs, InfoType};
//! use tdump_core::dump_namespace;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>>
//! {
//!     let mut builder = TypelibBuilder::new("Demo");
//!     let constant = builder.add(NodeSpec::new(InfoType::Constant, "MAJOR", Attrs::Constant))?;
//!     builder.add_root(constant)?;
//!     let typelib = builder.build()?;
//!
//!     let documents = dump_namespace(&typelib.infos(), true)?;
//!     assert_eq!(documents[0].get("name").and_then(|d| d.as_str()), Some("MAJOR"));
//!     Ok(())
//! }
//! ```

use tracing::{debug, trace, warn};

use crate::document::{Difference, Document, Map};
use crate::error::{DumpError, DumpResult};
use crate::info::{
    render_flags, Attrs, CallableAttrs, Collection, InfoHandle, InfoType, Link, RegisteredTypeAttrs, TypeTag,
};
use crate::options::DumpOptions;

/// Value written in place of ABI-dependent numbers when `skip_abi` is set.
pub const SKIP_ABI_PLACEHOLDER: &str = "(SKIP_ABI)";

/// Dump one node.
///
/// An absent handle dumps to the empty mapping.
///
/// ## Errors
///
/// - [`DumpError::UnknownVariant`] if a fully dumped node has no projection
/// - [`DumpError::AttrsMismatch`] if a node's projection does not fit its kind
/// - [`DumpError::MissingChild`] if the backend does not resolve a collection
///   or reference its kind defines
pub fn dump<H: InfoHandle>(handle: Option<&H>, skip_abi: bool, minimal: bool) -> DumpResult<Document>
{
    Dumper::new(DumpOptions { skip_abi, minimal }).dump(handle)
}

/// Dump the handles of a namespace, sorted by name.
///
/// ## Errors
///
/// Fails on the first node that fails; no partial output is returned.
pub fn dump_namespace<H: InfoHandle>(handles: &[H], skip_abi: bool) -> DumpResult<Vec<Document>>
{
    Dumper::new(DumpOptions::new().with_skip_abi(skip_abi)).dump_all(handles)
}

/// Dump two readers' views of a namespace with ABI redaction and list where
/// they disagree. An empty result means the readers are equivalent.
///
/// ## Errors
///
/// Fails if either dump fails.
pub fn compare_namespaces<L, R>(left: &[L], right: &[R]) -> DumpResult<Vec<Difference>>
where
    L: InfoHandle,
    R: InfoHandle,
{
    let dumper = Dumper::new(DumpOptions::comparison());
    let left = Document::List(dumper.dump_all(left)?);
    let right = Document::List(dumper.dump_all(right)?);
    let differences = left.diff(&right);
    debug!(differences = differences.len(), "compared namespaces");
    Ok(differences)
}

/// Reusable dump configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dumper
{
    options: DumpOptions,
}

impl Dumper
{
    #[must_use]
    pub fn new(options: DumpOptions) -> Self
    {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> DumpOptions
    {
        self.options
    }

    /// Dump one node with the configured options.
    ///
    /// ## Errors
    ///
    /// See [`dump`].
    pub fn dump<H: InfoHandle>(&self, handle: Option<&H>) -> DumpResult<Document>
    {
        self.visit(handle, self.options.minimal)
    }

    /// Dump a root list, sorted by name.
    ///
    /// ## Errors
    ///
    /// See [`dump_namespace`].
    pub fn dump_all<H: InfoHandle>(&self, handles: &[H]) -> DumpResult<Vec<Document>>
    {
        debug!(
            roots = handles.len(),
            skip_abi = self.options.skip_abi,
            minimal = self.options.minimal,
            "dumping namespace"
        );
        let documents = self.sorted(handles, self.options.minimal)?;
        debug!(documents = documents.len(), "namespace dumped");
        Ok(documents)
    }

    fn visit<H: InfoHandle>(&self, handle: Option<&H>, minimal: bool) -> DumpResult<Document>
    {
        let Some(handle) = handle else {
            return Ok(Document::empty());
        };

        let info_type = handle.info_type();
        let attrs = handle.attrs();
        trace!(%info_type, node = handle.name().unwrap_or_default(), minimal, "visiting node");
        if !attrs.accepts(info_type) {
            warn!(%info_type, tag = attrs.tag(), "projection does not fit node kind");
            return Err(DumpError::AttrsMismatch {
                info_type,
                tag: attrs.tag(),
            });
        }

        let mut out = Fields::default();
        out.put("type", attrs.tag());

        // Type nodes are anonymous and never truncated.
        if info_type != InfoType::Type {
            out.put("info_type", info_type.as_str());
            out.put("namespace", handle.namespace());
            out.put("name", handle.name());
            if minimal {
                return Ok(out.finish());
            }
            out.put("deprecated", handle.is_deprecated());
            out.put("attributes", attribute_map(handle.attributes()));
        }

        match attrs {
            Attrs::Function {
                callable,
                flags,
                symbol,
            } => {
                self.callable(handle, &callable, &mut out)?;
                out.put("flags", render_flags(&flags));
                out.put("symbol", symbol);
            }
            Attrs::Callback { callable } => {
                self.callable(handle, &callable, &mut out)?;
            }
            Attrs::Signal {
                callable,
                flags,
                true_stops_emit,
            } => {
                self.callable(handle, &callable, &mut out)?;
                out.put("flags", render_flags(&flags));
                out.put("true_stops_emit", true_stops_emit);
                out.put("class_closure", self.reference(handle, Link::ClassClosure, true)?);
            }
            Attrs::VFunc {
                callable,
                flags,
                offset,
            } => {
                self.callable(handle, &callable, &mut out)?;
                out.put("flags", render_flags(&flags));
                out.put("offset", self.abi(offset));
                out.put("signal", self.reference(handle, Link::Signal, false)?);
                out.put("invoker", self.reference(handle, Link::Invoker, true)?);
            }
            Attrs::Enum {
                registered,
                enumeration,
            } => {
                registered_type(&registered, &mut out);
                out.put("storage_type", enumeration.storage_type.as_str());
                out.put("values", self.collection(handle, Collection::Values, false)?);
                out.put("error_domain", enumeration.error_domain);
            }
            Attrs::Interface { registered } => {
                registered_type(&registered, &mut out);
                out.put("iface_struct", self.reference(handle, Link::IfaceStruct, true)?);
                out.put("prerequisites", self.collection(handle, Collection::Prerequisites, true)?);
                for collection in [
                    Collection::Properties,
                    Collection::Methods,
                    Collection::Signals,
                    Collection::VFuncs,
                    Collection::Constants,
                ] {
                    out.put(collection.key(), self.collection(handle, collection, false)?);
                }
            }
            Attrs::Object { registered, object } => {
                registered_type(&registered, &mut out);
                out.put("abstract", object.is_abstract);
                out.put("fundamental", object.fundamental);
                for collection in [
                    Collection::Constants,
                    Collection::Fields,
                    Collection::Interfaces,
                    Collection::Methods,
                    Collection::Properties,
                    Collection::Signals,
                    Collection::VFuncs,
                ] {
                    out.put(collection.key(), self.collection(handle, collection, false)?);
                }
                out.put("class_struct", self.reference(handle, Link::ClassStruct, true)?);
                out.put("ref_function", object.ref_function);
                out.put("unref_function", object.unref_function);
                out.put("set_value_function", object.set_value_function);
                out.put("get_value_function", object.get_value_function);
            }
            Attrs::Struct { registered, layout } => {
                registered_type(&registered, &mut out);
                out.put("size", self.abi(layout.size));
                out.put("alignment", self.abi(layout.alignment));
                out.put("is_gtype_struct", layout.is_gtype_struct);
                out.put("is_foreign", layout.is_foreign);
                out.put("fields", self.collection(handle, Collection::Fields, false)?);
                out.put("methods", self.collection(handle, Collection::Methods, false)?);
            }
            Attrs::Union { registered, layout } => {
                registered_type(&registered, &mut out);
                out.put("size", self.abi(layout.size));
                out.put("alignment", self.abi(layout.alignment));
                out.put("is_discriminated", layout.is_discriminated);
                out.put("discriminator_offset", self.abi(layout.discriminator_offset));
                out.put("discriminator_type", self.reference(handle, Link::DiscriminatorType, true)?);
                out.put("fields", self.collection(handle, Collection::Fields, false)?);
                out.put("methods", self.collection(handle, Collection::Methods, false)?);
            }
            Attrs::Arg(arg) => {
                out.put("closure", arg.closure);
                out.put("destroy", arg.destroy);
                out.put("direction", arg.direction.as_str());
                out.put("ownership_transfer", arg.ownership_transfer.as_str());
                out.put("scope", arg.scope.as_str());
                out.put("type", self.reference(handle, Link::Type, false)?);
                out.put("may_be_null", arg.may_be_null);
                out.put("is_caller_allocates", arg.is_caller_allocates);
                out.put("is_optional", arg.is_optional);
                out.put("is_return_value", arg.is_return_value);
                out.put("is_skip", arg.is_skip);
            }
            Attrs::Constant => {
                out.put("type", self.reference(handle, Link::Type, false)?);
            }
            Attrs::Field(field) => {
                out.put("flags", render_flags(&field.flags));
                out.put("offset", self.abi(field.offset));
                out.put("size", self.abi(field.size));
                out.put("type", self.reference(handle, Link::Type, false)?);
            }
            Attrs::Property(property) => {
                out.put("flags", render_flags(&property.flags));
                out.put("ownership_transfer", property.ownership_transfer.as_str());
                out.put("type", self.reference(handle, Link::Type, false)?);
            }
            Attrs::Type(ty) => {
                out.put("is_pointer", ty.is_pointer);
                out.put("tag", ty.tag.as_str());
                out.put("interface", self.reference(handle, Link::Interface, true)?);
                out.put("array_length", ty.array_length);
                out.put("array_fixed_size", ty.array_fixed_size);
                out.put("is_zero_terminated", ty.is_zero_terminated);
                if ty.tag == TypeTag::Array {
                    out.put("array_type", ty.array_type.map(|array_type| array_type.as_str()));
                }
            }
            Attrs::Value { value } => {
                out.put("value", value);
            }
            Attrs::Opaque => {
                let name = handle.name().unwrap_or("<anonymous>");
                warn!(%info_type, node = name, "cannot dump node kind");
                return Err(DumpError::UnknownVariant(format!(
                    "{info_type} node '{}.{name}'",
                    handle.namespace()
                )));
            }
        }

        Ok(out.finish())
    }

    fn callable<H: InfoHandle>(&self, handle: &H, callable: &CallableAttrs, out: &mut Fields) -> DumpResult<()>
    {
        out.put("can_throw_gerror", callable.can_throw_gerror);
        out.put("may_return_null", callable.may_return_null);
        out.put("skip_return", callable.skip_return);
        out.put("caller_owns", callable.caller_owns.as_str());
        out.put(
            "return_attributes",
            attribute_map(
                callable
                    .return_attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect(),
            ),
        );
        out.put("args", self.collection(handle, Collection::Args, false)?);
        out.put("return_type", self.reference(handle, Link::ReturnType, true)?);
        Ok(())
    }

    fn collection<H: InfoHandle>(&self, handle: &H, collection: Collection, minimal: bool) -> DumpResult<Document>
    {
        let children = handle.children(collection)?;
        Ok(Document::List(self.sorted(&children, minimal)?))
    }

    fn reference<H: InfoHandle>(&self, handle: &H, link: Link, minimal: bool) -> DumpResult<Document>
    {
        let target = handle.link(link)?;
        self.visit(target.as_ref(), minimal)
    }

    fn sorted<H: InfoHandle>(&self, handles: &[H], minimal: bool) -> DumpResult<Vec<Document>>
    {
        let mut order: Vec<&H> = handles.iter().collect();
        order.sort_by(|a, b| a.name().cmp(&b.name()));

        let mut dumped = order
            .into_iter()
            .map(|handle| -> DumpResult<_> { Ok((handle.name(), self.visit(Some(handle), minimal)?)) })
            .collect::<DumpResult<Vec<_>>>()?;

        // Siblings sharing a name are ordered by content, so readers that
        // declare them in different orders still agree.
        dumped.sort_by(|(a_name, a_doc), (b_name, b_doc)| a_name.cmp(b_name).then_with(|| a_doc.cmp(b_doc)));

        Ok(dumped.into_iter().map(|(_, document)| document).collect())
    }

    fn abi(&self, value: impl Into<Document>) -> Document
    {
        if self.options.skip_abi {
            Document::from(SKIP_ABI_PLACEHOLDER)
        } else {
            value.into()
        }
    }
}

fn registered_type(registered: &RegisteredTypeAttrs, out: &mut Fields)
{
    out.put("type_name", registered.type_name.as_deref());
    out.put("type_init", registered.type_init.as_deref());
}

/// Annotations as a mapping sorted by name, then value.
fn attribute_map(mut attributes: Vec<(&str, &str)>) -> Document
{
    attributes.sort_unstable();
    Document::map(attributes.into_iter().map(|(name, value)| (name, Document::from(value))))
}

/// Mapping under construction for one node.
#[derive(Default)]
struct Fields(Map);

impl Fields
{
    fn put(&mut self, key: &str, value: impl Into<Document>)
    {
        self.0.insert(key.to_owned(), value.into());
    }

    fn finish(self) -> Document
    {
        Document::Map(self.0)
    }
}
