//! Shared fixtures: a small "Demo" namespace and a second, independent reader
//! of the serialized typelib blob.

#![allow(dead_code)]

use serde_json::Value;
use tdump_core::graph::{NodeId, NodeSpec, Typelib, TypelibBuilder};
use tdump_core::info::{
    missing_child, ArgAttrs, ArrayType, Attrs, CallableAttrs, Collection, Direction, EnumAttrs, FieldAttrs,
    FieldFlags, FunctionFlags, InfoHandle, InfoType, Link, ObjectAttrs, PropertyAttrs, PropertyFlags,
    RegisteredTypeAttrs, ScopeType, SignalFlags, StructAttrs, Transfer, TypeAttrs, TypeTag, UnionAttrs, VFuncFlags,
};
use tdump_core::DumpResult;

/// Builder wrapper that can declare every child list in reverse, to model a
/// reader that walks the blob in a different order.
pub struct Fixture
{
    builder: TypelibBuilder,
    reverse: bool,
}

impl Fixture
{
    pub fn new(namespace: &str, reverse: bool) -> Self
    {
        Self {
            builder: TypelibBuilder::new(namespace),
            reverse,
        }
    }

    pub fn add(&mut self, spec: NodeSpec) -> NodeId
    {
        self.builder.add(spec).unwrap()
    }

    pub fn ty(&mut self, attrs: TypeAttrs, interface: Option<NodeId>) -> NodeId
    {
        let id = self.add(NodeSpec::anonymous(InfoType::Type, Attrs::Type(attrs)));
        if let Some(target) = interface {
            self.link(id, Link::Interface, target);
        }
        id
    }

    pub fn basic(&mut self, tag: TypeTag) -> NodeId
    {
        self.ty(TypeAttrs::new(tag, false), None)
    }

    pub fn iface_type(&mut self, target: NodeId) -> NodeId
    {
        self.ty(TypeAttrs::new(TypeTag::Interface, true), Some(target))
    }

    pub fn children(&mut self, parent: NodeId, collection: Collection, ids: &[NodeId])
    {
        let mut ids = ids.to_vec();
        if self.reverse {
            ids.reverse();
        }
        for id in ids {
            self.builder.push_child(parent, collection, id).unwrap();
        }
    }

    pub fn link(&mut self, parent: NodeId, link: Link, target: NodeId)
    {
        self.builder.set_link(parent, link, target).unwrap();
    }

    pub fn arg(&mut self, name: &str, tag: TypeTag) -> NodeId
    {
        let arg = self.add(NodeSpec::new(InfoType::Arg, name, Attrs::Arg(ArgAttrs::default())));
        let ty = self.basic(tag);
        self.link(arg, Link::Type, ty);
        arg
    }

    pub fn function(&mut self, name: &str, symbol: &str, flags: FunctionFlags, args: &[NodeId]) -> NodeId
    {
        let id = self.add(NodeSpec::new(
            InfoType::Function,
            name,
            Attrs::Function {
                callable: CallableAttrs::default(),
                flags,
                symbol: Some(symbol.to_owned()),
            },
        ));
        let ret = self.basic(TypeTag::Void);
        self.link(id, Link::ReturnType, ret);
        self.children(id, Collection::Args, args);
        id
    }

    pub fn field(&mut self, name: &str, offset: i32, ty: NodeId) -> NodeId
    {
        let id = self.add(NodeSpec::new(
            InfoType::Field,
            name,
            Attrs::Field(FieldAttrs {
                flags: FieldFlags::READABLE | FieldFlags::WRITABLE,
                offset,
                size: 0,
            }),
        ));
        self.link(id, Link::Type, ty);
        id
    }

    pub fn value(&mut self, name: &str, value: i64) -> NodeId
    {
        self.add(NodeSpec::new(InfoType::Value, name, Attrs::Value { value }))
    }

    pub fn build(self, roots: &[NodeId]) -> Typelib
    {
        let mut builder = self.builder;
        let mut roots = roots.to_vec();
        if self.reverse {
            roots.reverse();
        }
        for root in roots {
            builder.add_root(root).unwrap();
        }
        builder.build().unwrap()
    }
}

fn registered(type_name: &str, type_init: &str) -> RegisteredTypeAttrs
{
    RegisteredTypeAttrs {
        type_name: Some(type_name.to_owned()),
        type_init: Some(type_init.to_owned()),
    }
}

/// ABI numbers used by the demo namespace; tests override them to model a
/// second platform.
#[derive(Clone, Copy)]
pub struct Abi
{
    pub rect_size: u32,
    pub rect_alignment: u32,
    pub pointer_size: i32,
}

impl Default for Abi
{
    fn default() -> Self
    {
        Self {
            rect_size: 24,
            rect_alignment: 8,
            pointer_size: 8,
        }
    }
}

/// The demo namespace in declaration order.
pub fn demo() -> Typelib
{
    demo_with(false, Abi::default())
}

/// The demo namespace with every collection and the root list reversed.
pub fn demo_reversed() -> Typelib
{
    demo_with(true, Abi::default())
}

#[allow(clippy::too_many_lines)]
pub fn demo_with(reverse: bool, abi: Abi) -> Typelib
{
    let mut f = Fixture::new("Demo", reverse);

    // Cross-namespace parent, only ever referenced.
    let gobject = f.add(NodeSpec::new(InfoType::Unresolved, "Object", Attrs::Opaque).in_namespace("GObject"));

    // Rect: plain struct with fields declared out of name order.
    let rect = f.add(NodeSpec::new(
        InfoType::Struct,
        "Rect",
        Attrs::Struct {
            registered: registered("DemoRect", "demo_rect_get_type"),
            layout: StructAttrs {
                size: abi.rect_size,
                alignment: abi.rect_alignment,
                is_gtype_struct: false,
                is_foreign: false,
            },
        },
    ));
    let int_ty = f.basic(TypeTag::Int32);
    let width = f.field("width", abi.pointer_size * 2, int_ty);
    let int_ty = f.basic(TypeTag::Int32);
    let x = f.field("x", 0, int_ty);
    let int_ty = f.basic(TypeTag::Int32);
    let y = f.field("y", abi.pointer_size / 2, int_ty);
    f.children(rect, Collection::Fields, &[width, x, y]);
    let self_arg = f.arg("self", TypeTag::Interface);
    let area = f.function("area", "demo_rect_area", FunctionFlags::IS_METHOD, &[self_arg]);
    f.children(rect, Collection::Methods, &[area]);

    // Orientation: enum with values out of name order.
    let orientation = f.add(NodeSpec::new(
        InfoType::Enum,
        "Orientation",
        Attrs::Enum {
            registered: registered("DemoOrientation", "demo_orientation_get_type"),
            enumeration: EnumAttrs {
                storage_type: TypeTag::UInt32,
                error_domain: None,
            },
        },
    ));
    let vertical = f.value("vertical", 1);
    let horizontal = f.value("horizontal", 0);
    f.children(orientation, Collection::Values, &[vertical, horizontal]);

    // StateFlags: flags, deprecated, with an annotation.
    let state = f.add(
        NodeSpec::new(
            InfoType::Flags,
            "StateFlags",
            Attrs::Enum {
                registered: registered("DemoStateFlags", "demo_state_flags_get_type"),
                enumeration: EnumAttrs {
                    storage_type: TypeTag::UInt32,
                    error_domain: None,
                },
            },
        )
        .deprecated(true)
        .attribute("since", "1.2"),
    );
    let normal = f.value("normal", 0);
    let active = f.value("active", 1);
    let prelight = f.value("prelight", 2);
    f.children(state, Collection::Values, &[prelight, normal, active]);

    // Error: error-domain enum.
    let error = f.add(NodeSpec::new(
        InfoType::Enum,
        "Error",
        Attrs::Enum {
            registered: RegisteredTypeAttrs::default(),
            enumeration: EnumAttrs {
                storage_type: TypeTag::Int32,
                error_domain: Some("demo-error-quark".to_owned()),
            },
        },
    ));
    let failed = f.value("failed", 0);
    f.children(error, Collection::Values, &[failed]);

    // Event: discriminated union.
    let event = f.add(NodeSpec::new(
        InfoType::Union,
        "Event",
        Attrs::Union {
            registered: registered("DemoEvent", "demo_event_get_type"),
            layout: UnionAttrs {
                size: 32,
                alignment: 8,
                is_discriminated: true,
                discriminator_offset: 4,
            },
        },
    ));
    let disc_ty = f.iface_type(orientation);
    f.link(event, Link::DiscriminatorType, disc_ty);
    let rect_ty = f.iface_type(rect);
    let any = f.field("any", 0, rect_ty);
    let int_ty = f.basic(TypeTag::UInt32);
    let key = f.field("key", 0, int_ty);
    f.children(event, Collection::Fields, &[key, any]);

    // Callback with a user-data closure argument.
    let callback = f.add(NodeSpec::new(
        InfoType::Callback,
        "Callback",
        Attrs::Callback {
            callable: CallableAttrs {
                may_return_null: true,
                ..CallableAttrs::default()
            },
        },
    ));
    let data = f.add(NodeSpec::new(
        InfoType::Arg,
        "user_data",
        Attrs::Arg(ArgAttrs {
            closure: 0,
            may_be_null: true,
            ..ArgAttrs::default()
        }),
    ));
    let data_ty = f.ty(TypeAttrs::new(TypeTag::Void, true), None);
    f.link(data, Link::Type, data_ty);
    f.children(callback, Collection::Args, &[data]);
    let ret = f.basic(TypeTag::Boolean);
    f.link(callback, Link::ReturnType, ret);

    // init: throwing function with a C array argument.
    let argv = f.add(NodeSpec::new(
        InfoType::Arg,
        "argv",
        Attrs::Arg(ArgAttrs {
            direction: Direction::InOut,
            ownership_transfer: Transfer::Everything,
            scope: ScopeType::Call,
            is_optional: true,
            ..ArgAttrs::default()
        }),
    ));
    let argv_ty = f.ty(
        TypeAttrs {
            is_zero_terminated: true,
            ..TypeAttrs::array(ArrayType::C)
        },
        None,
    );
    f.link(argv, Link::Type, argv_ty);
    let init = f.add(NodeSpec::new(
        InfoType::Function,
        "init",
        Attrs::Function {
            callable: CallableAttrs {
                can_throw_gerror: true,
                caller_owns: Transfer::Nothing,
                return_attributes: vec![("since".to_owned(), "1.0".to_owned())],
                ..CallableAttrs::default()
            },
            flags: FunctionFlags::THROWS,
            symbol: Some("demo_init".to_owned()),
        },
    ));
    f.children(init, Collection::Args, &[argv]);
    let ret = f.basic(TypeTag::Boolean);
    f.link(init, Link::ReturnType, ret);

    // VERSION constant.
    let version = f.add(NodeSpec::new(InfoType::Constant, "VERSION", Attrs::Constant));
    let utf8 = f.ty(TypeAttrs::new(TypeTag::Utf8, true), None);
    f.link(version, Link::Type, utf8);

    // Widget object and its class struct, plus the Buildable interface.
    let widget = f.add(NodeSpec::new(
        InfoType::Object,
        "Widget",
        Attrs::Object {
            registered: registered("DemoWidget", "demo_widget_get_type"),
            object: ObjectAttrs {
                is_abstract: true,
                ..ObjectAttrs::default()
            },
        },
    ));
    let widget_class = f.add(NodeSpec::new(
        InfoType::Struct,
        "WidgetClass",
        Attrs::Struct {
            registered: RegisteredTypeAttrs::default(),
            layout: StructAttrs {
                size: 136,
                alignment: 8,
                is_gtype_struct: true,
                is_foreign: false,
            },
        },
    ));
    let buildable = f.add(NodeSpec::new(
        InfoType::Interface,
        "Buildable",
        Attrs::Interface {
            registered: registered("DemoBuildable", "demo_buildable_get_type"),
        },
    ));
    let buildable_iface = f.add(NodeSpec::new(
        InfoType::Struct,
        "BuildableIface",
        Attrs::Struct {
            registered: RegisteredTypeAttrs::default(),
            layout: StructAttrs {
                size: 40,
                alignment: 8,
                is_gtype_struct: true,
                is_foreign: false,
            },
        },
    ));

    // Widget members.
    let parent_ty = f.iface_type(gobject);
    let parent_instance = f.field("parent_instance", 0, parent_ty);
    let priv_ty = f.ty(TypeAttrs::new(TypeTag::Void, true), None);
    let private = f.field("priv", abi.pointer_size * 3, priv_ty);
    f.children(widget, Collection::Fields, &[private, parent_instance]);

    let show = f.function("show", "demo_widget_show", FunctionFlags::IS_METHOD, &[]);
    let width_arg = f.arg("width", TypeTag::Int32);
    let height_arg = f.arg("height", TypeTag::Int32);
    let set_size = f.function(
        "set_size",
        "demo_widget_set_size",
        FunctionFlags::IS_METHOD,
        &[width_arg, height_arg],
    );
    let new = f.function("new", "demo_widget_new", FunctionFlags::IS_CONSTRUCTOR, &[]);
    f.children(widget, Collection::Methods, &[show, set_size, new]);

    let visible = f.add(NodeSpec::new(
        InfoType::Property,
        "visible",
        Attrs::Property(PropertyAttrs {
            flags: PropertyFlags::READABLE | PropertyFlags::WRITABLE,
            ownership_transfer: Transfer::Nothing,
        }),
    ));
    let bool_ty = f.basic(TypeTag::Boolean);
    f.link(visible, Link::Type, bool_ty);
    f.children(widget, Collection::Properties, &[visible]);

    let clicked_signal = f.add(NodeSpec::new(
        InfoType::Signal,
        "clicked",
        Attrs::Signal {
            callable: CallableAttrs::default(),
            flags: SignalFlags::RUN_LAST | SignalFlags::ACTION,
            true_stops_emit: false,
        },
    ));
    let ret = f.basic(TypeTag::Void);
    f.link(clicked_signal, Link::ReturnType, ret);
    let clicked_vfunc = f.add(NodeSpec::new(
        InfoType::VFunc,
        "clicked",
        Attrs::VFunc {
            callable: CallableAttrs::default(),
            flags: VFuncFlags::empty(),
            offset: abi.pointer_size * 17,
        },
    ));
    let ret = f.basic(TypeTag::Void);
    f.link(clicked_vfunc, Link::ReturnType, ret);
    f.link(clicked_signal, Link::ClassClosure, clicked_vfunc);
    f.link(clicked_vfunc, Link::Signal, clicked_signal);
    f.link(clicked_vfunc, Link::Invoker, show);
    f.children(widget, Collection::Signals, &[clicked_signal]);
    f.children(widget, Collection::VFuncs, &[clicked_vfunc]);

    let max_children = f.add(NodeSpec::new(InfoType::Constant, "MAX_CHILDREN", Attrs::Constant));
    let int_ty = f.basic(TypeTag::Int32);
    f.link(max_children, Link::Type, int_ty);
    f.children(widget, Collection::Constants, &[max_children]);
    f.children(widget, Collection::Interfaces, &[buildable]);
    f.link(widget, Link::ClassStruct, widget_class);

    // WidgetClass members: parent class and the vfunc slot.
    let class_parent_ty = f.basic(TypeTag::Void);
    let parent_class = f.field("parent_class", 0, class_parent_ty);
    let slot_ty = f.iface_type(callback);
    let slot = f.field("clicked", abi.pointer_size * 17, slot_ty);
    f.children(widget_class, Collection::Fields, &[slot, parent_class]);

    // Buildable members.
    f.link(buildable, Link::IfaceStruct, buildable_iface);
    f.children(buildable, Collection::Prerequisites, &[widget]);
    let get_id = f.function("get_id", "demo_buildable_get_id", FunctionFlags::IS_METHOD, &[]);
    f.children(buildable, Collection::Methods, &[get_id]);

    f.build(&[
        widget,
        buildable,
        widget_class,
        buildable_iface,
        rect,
        event,
        orientation,
        state,
        error,
        callback,
        init,
        version,
    ])
}

/// A reader of the serialized typelib that never touches `Typelib`: it walks
/// the raw JSON tree and returns every child list in reverse.
pub struct BlobReader
{
    root: Value,
}

impl BlobReader
{
    pub fn new(bytes: &[u8]) -> Self
    {
        Self {
            root: serde_json::from_slice(bytes).unwrap(),
        }
    }

    pub fn infos(&self) -> Vec<BlobInfo<'_>>
    {
        self.root["roots"]
            .as_array()
            .unwrap()
            .iter()
            .rev()
            .map(|id| self.at(id))
            .collect()
    }

    fn at(&self, id: &Value) -> BlobInfo<'_>
    {
        BlobInfo {
            reader: self,
            node: &self.root["nodes"][usize::try_from(id.as_u64().unwrap()).unwrap()],
        }
    }
}

pub struct BlobInfo<'a>
{
    reader: &'a BlobReader,
    node: &'a Value,
}

impl<'a> BlobInfo<'a>
{
    fn entries(&self, key: &str) -> impl DoubleEndedIterator<Item = &'a Vec<Value>>
    {
        let node: &'a Value = self.node;
        node[key]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_array)
    }
}

impl InfoHandle for BlobInfo<'_>
{
    fn info_type(&self) -> InfoType
    {
        let raw = u32::try_from(self.node["info_type"].as_u64().unwrap()).unwrap();
        InfoType::try_from(raw).unwrap()
    }

    fn namespace(&self) -> &str
    {
        self.node
            .get("namespace")
            .and_then(Value::as_str)
            .unwrap_or_else(|| self.reader.root["namespace"].as_str().unwrap())
    }

    fn name(&self) -> Option<&str>
    {
        self.node["name"].as_str()
    }

    fn is_deprecated(&self) -> bool
    {
        self.node["deprecated"].as_bool().unwrap_or(false)
    }

    fn attributes(&self) -> Vec<(&str, &str)>
    {
        self.entries("attributes")
            .map(|pair| (pair[0].as_str().unwrap(), pair[1].as_str().unwrap()))
            .rev()
            .collect()
    }

    fn attrs(&self) -> Attrs
    {
        serde_json::from_value(self.node["attrs"].clone()).unwrap()
    }

    fn children(&self, collection: Collection) -> DumpResult<Vec<Self>>
    {
        let info_type = self.info_type();
        if !collection.defined_for(info_type) {
            return Err(missing_child(info_type, collection));
        }
        Ok(self
            .entries("children")
            .find(|pair| pair[0].as_str() == Some(collection.key()))
            .map(|pair| pair[1].as_array().unwrap().iter().rev().map(|id| self.reader.at(id)).collect())
            .unwrap_or_default())
    }

    fn link(&self, link: Link) -> DumpResult<Option<Self>>
    {
        let info_type = self.info_type();
        if !link.defined_for(info_type) {
            return Err(missing_child(info_type, link));
        }
        Ok(self
            .entries("links")
            .find(|pair| pair[0].as_str() == Some(link.key()))
            .map(|pair| self.reader.at(&pair[1])))
    }
}
