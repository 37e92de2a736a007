//! Per-variant attribute projections.
//!
//! [`Attrs`] is the closed sum of every specialization a node can have. The
//! callable and registered-type specializations carry their shared fields in
//! [`CallableAttrs`] and [`RegisteredTypeAttrs`], so one value answers both
//! "is this callable" and "is this a function".

use serde::{Deserialize, Serialize};

use super::flags::{FieldFlags, FunctionFlags, PropertyFlags, SignalFlags, VFuncFlags};
use super::kinds::{ArrayType, Direction, InfoType, ScopeType, Transfer, TypeTag};

/// Fields shared by functions, callbacks, signals and vfuncs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableAttrs
{
    pub can_throw_gerror: bool,
    pub may_return_null: bool,
    pub skip_return: bool,
    /// Ownership of the return value.
    pub caller_owns: Transfer,
    /// Annotations on the return value, in declaration order.
    pub return_attributes: Vec<(String, String)>,
}

/// Fields shared by every registered type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTypeAttrs
{
    pub type_name: Option<String>,
    /// Symbol of the `get_type` function.
    pub type_init: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumAttrs
{
    pub storage_type: TypeTag,
    pub error_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAttrs
{
    pub is_abstract: bool,
    pub fundamental: bool,
    pub ref_function: Option<String>,
    pub unref_function: Option<String>,
    pub set_value_function: Option<String>,
    pub get_value_function: Option<String>,
}

/// Layout of a struct. Size and alignment depend on the target ABI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructAttrs
{
    pub size: u32,
    pub alignment: u32,
    pub is_gtype_struct: bool,
    pub is_foreign: bool,
}

/// Layout of a union. Size, alignment and discriminator offset depend on the
/// target ABI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionAttrs
{
    pub size: u32,
    pub alignment: u32,
    pub is_discriminated: bool,
    pub discriminator_offset: i32,
}

/// Argument of a callable. `closure` and `destroy` are argument indices, `-1`
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgAttrs
{
    pub closure: i32,
    pub destroy: i32,
    pub direction: Direction,
    pub ownership_transfer: Transfer,
    pub scope: ScopeType,
    pub may_be_null: bool,
    pub is_caller_allocates: bool,
    pub is_optional: bool,
    pub is_return_value: bool,
    pub is_skip: bool,
}

impl Default for ArgAttrs
{
    fn default() -> Self
    {
        Self {
            closure: -1,
            destroy: -1,
            direction: Direction::In,
            ownership_transfer: Transfer::Nothing,
            scope: ScopeType::Invalid,
            may_be_null: false,
            is_caller_allocates: false,
            is_optional: false,
            is_return_value: false,
            is_skip: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAttrs
{
    pub flags: FieldFlags,
    /// Byte offset inside the owning struct or union.
    pub offset: i32,
    /// Bit size, `0` for non-bitfields.
    pub size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAttrs
{
    pub flags: PropertyFlags,
    pub ownership_transfer: Transfer,
}

/// A type reference. Array bookkeeping uses `-1` for "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAttrs
{
    pub is_pointer: bool,
    pub tag: TypeTag,
    pub array_length: i32,
    pub array_fixed_size: i32,
    pub is_zero_terminated: bool,
    /// Only meaningful when `tag` is [`TypeTag::Array`].
    pub array_type: Option<ArrayType>,
}

impl TypeAttrs
{
    /// A non-array type with the given tag.
    #[must_use]
    pub fn new(tag: TypeTag, is_pointer: bool) -> Self
    {
        Self {
            is_pointer,
            tag,
            array_length: -1,
            array_fixed_size: -1,
            is_zero_terminated: false,
            array_type: None,
        }
    }

    /// An array of the given container kind.
    #[must_use]
    pub fn array(array_type: ArrayType) -> Self
    {
        Self {
            array_type: Some(array_type),
            ..Self::new(TypeTag::Array, true)
        }
    }
}

impl Default for TypeAttrs
{
    fn default() -> Self
    {
        Self::new(TypeTag::Void, false)
    }
}

/// Specialization of a node together with its scalar attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attrs
{
    Function
    {
        callable: CallableAttrs,
        flags: FunctionFlags,
        symbol: Option<String>,
    },
    Callback
    {
        callable: CallableAttrs,
    },
    Signal
    {
        callable: CallableAttrs,
        flags: SignalFlags,
        true_stops_emit: bool,
    },
    VFunc
    {
        callable: CallableAttrs,
        flags: VFuncFlags,
        /// Slot offset in the class struct.
        offset: i32,
    },
    Enum
    {
        registered: RegisteredTypeAttrs,
        enumeration: EnumAttrs,
    },
    Interface
    {
        registered: RegisteredTypeAttrs,
    },
    Object
    {
        registered: RegisteredTypeAttrs,
        object: ObjectAttrs,
    },
    Struct
    {
        registered: RegisteredTypeAttrs,
        layout: StructAttrs,
    },
    Union
    {
        registered: RegisteredTypeAttrs,
        layout: UnionAttrs,
    },
    Arg(ArgAttrs),
    Constant,
    Field(FieldAttrs),
    Property(PropertyAttrs),
    Type(TypeAttrs),
    Value
    {
        value: i64,
    },
    /// No projection: invalid, boxed and unresolved nodes.
    Opaque,
}

impl Attrs
{
    /// Name of the most specific variant, as written into dumps.
    #[must_use]
    pub fn tag(&self) -> &'static str
    {
        match self {
            Attrs::Function { .. } => "FunctionInfo",
            Attrs::Callback { .. } => "CallbackInfo",
            Attrs::Signal { .. } => "SignalInfo",
            Attrs::VFunc { .. } => "VFuncInfo",
            Attrs::Enum { .. } => "EnumInfo",
            Attrs::Interface { .. } => "InterfaceInfo",
            Attrs::Object { .. } => "ObjectInfo",
            Attrs::Struct { .. } => "StructInfo",
            Attrs::Union { .. } => "UnionInfo",
            Attrs::Arg(_) => "ArgInfo",
            Attrs::Constant => "ConstantInfo",
            Attrs::Field(_) => "FieldInfo",
            Attrs::Property(_) => "PropertyInfo",
            Attrs::Type(_) => "TypeInfo",
            Attrs::Value { .. } => "ValueInfo",
            Attrs::Opaque => "BaseInfo",
        }
    }

    /// Whether a node of kind `info_type` may carry this projection.
    #[must_use]
    pub fn accepts(&self, info_type: InfoType) -> bool
    {
        match self {
            Attrs::Function { .. } => info_type == InfoType::Function,
            Attrs::Callback { .. } => info_type == InfoType::Callback,
            Attrs::Signal { .. } => info_type == InfoType::Signal,
            Attrs::VFunc { .. } => info_type == InfoType::VFunc,
            Attrs::Enum { .. } => matches!(info_type, InfoType::Enum | InfoType::Flags),
            Attrs::Interface { .. } => info_type == InfoType::Interface,
            Attrs::Object { .. } => info_type == InfoType::Object,
            Attrs::Struct { .. } => info_type == InfoType::Struct,
            Attrs::Union { .. } => info_type == InfoType::Union,
            Attrs::Arg(_) => info_type == InfoType::Arg,
            Attrs::Constant => info_type == InfoType::Constant,
            Attrs::Field(_) => info_type == InfoType::Field,
            Attrs::Property(_) => info_type == InfoType::Property,
            Attrs::Type(_) => info_type == InfoType::Type,
            Attrs::Value { .. } => info_type == InfoType::Value,
            Attrs::Opaque => matches!(
                info_type,
                InfoType::Invalid | InfoType::Invalid0 | InfoType::Boxed | InfoType::Unresolved
            ),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_tag_matches_projection()
    {
        assert_eq!(Attrs::Constant.tag(), "ConstantInfo");
        assert_eq!(Attrs::Opaque.tag(), "BaseInfo");
        assert_eq!(Attrs::Type(TypeAttrs::default()).tag(), "TypeInfo");
    }

    #[test]
    fn test_enum_projection_covers_flags()
    {
        let attrs = Attrs::Enum {
            registered: RegisteredTypeAttrs::default(),
            enumeration: EnumAttrs::default(),
        };
        assert!(attrs.accepts(InfoType::Enum));
        assert!(attrs.accepts(InfoType::Flags));
        assert!(!attrs.accepts(InfoType::Struct));
    }

    #[test]
    fn test_opaque_only_for_unprojected_kinds()
    {
        assert!(Attrs::Opaque.accepts(InfoType::Unresolved));
        assert!(Attrs::Opaque.accepts(InfoType::Boxed));
        assert!(!Attrs::Opaque.accepts(InfoType::Object));
    }

    #[test]
    fn test_array_type_constructor()
    {
        let attrs = TypeAttrs::array(ArrayType::C);
        assert_eq!(attrs.tag, TypeTag::Array);
        assert_eq!(attrs.array_type, Some(ArrayType::C));
        assert_eq!(attrs.array_length, -1);
    }
}
