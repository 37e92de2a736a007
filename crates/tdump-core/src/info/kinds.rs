//! Closed vocabularies of the typelib format.
//!
//! Every enumeration here mirrors a numeric table in the binary format. The
//! numbers are part of the format, so each type converts to and from its raw
//! `u32` and serializes as that number. A raw value outside the table is an
//! [`DumpError::UnknownVariant`]: the blob uses a schema this crate does not
//! cover.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

macro_rules! typelib_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        #[repr(u32)]
        pub enum $name
        {
            $( $(#[$vmeta])* $variant = $raw, )+
        }

        impl $name
        {
            /// Every value of the table, in numeric order.
            pub const ALL: &'static [Self] = &[$( Self::$variant, )+];

            /// Look up a raw table value.
            #[must_use]
            pub fn from_raw(raw: u32) -> Option<Self>
            {
                match raw {
                    $( $raw => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The raw table value.
            #[must_use]
            pub fn as_raw(self) -> u32
            {
                self as u32
            }

            /// Lower-case label used in dumps.
            #[must_use]
            pub fn as_str(self) -> &'static str
            {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl Default for $name
        {
            fn default() -> Self
            {
                Self::$default
            }
        }

        impl TryFrom<u32> for $name
        {
            type Error = DumpError;

            fn try_from(raw: u32) -> Result<Self, DumpError>
            {
                Self::from_raw(raw)
                    .ok_or_else(|| DumpError::UnknownVariant(format!("{} {raw}", stringify!($name))))
            }
        }

        impl From<$name> for u32
        {
            fn from(value: $name) -> Self
            {
                value.as_raw()
            }
        }

        impl fmt::Display for $name
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            {
                f.write_str(self.as_str())
            }
        }
    };
}

typelib_enum! {
    /// Primary kind of a metadata node.
    ///
    /// `Invalid`, `Invalid0`, `Boxed` and `Unresolved` exist in the format but
    /// carry no dumpable projection: a full dump of such a node fails.
    InfoType, default = Invalid {
        Invalid = 0 => "invalid",
        Function = 1 => "function",
        Callback = 2 => "callback",
        Struct = 3 => "struct",
        Boxed = 4 => "boxed",
        Enum = 5 => "enum",
        Flags = 6 => "flags",
        Object = 7 => "object",
        Interface = 8 => "interface",
        Constant = 9 => "constant",
        /// Reserved slot, never written by current compilers.
        Invalid0 = 10 => "invalid_0",
        Union = 11 => "union",
        Value = 12 => "value",
        Signal = 13 => "signal",
        VFunc = 14 => "vfunc",
        Property = 15 => "property",
        Field = 16 => "field",
        Arg = 17 => "arg",
        Type = 18 => "type",
        /// Reference into a namespace that was not loaded.
        Unresolved = 19 => "unresolved",
    }
}

impl InfoType
{
    /// Function, callback, signal or vfunc.
    #[must_use]
    pub fn is_callable(self) -> bool
    {
        matches!(self, Self::Function | Self::Callback | Self::Signal | Self::VFunc)
    }

    /// Kinds backed by a registered runtime type.
    #[must_use]
    pub fn is_registered_type(self) -> bool
    {
        matches!(
            self,
            Self::Boxed | Self::Enum | Self::Flags | Self::Interface | Self::Object | Self::Struct | Self::Union
        )
    }
}

typelib_enum! {
    /// Storage tag of a type reference.
    TypeTag, default = Void {
        Void = 0 => "void",
        Boolean = 1 => "gboolean",
        Int8 = 2 => "gint8",
        UInt8 = 3 => "guint8",
        Int16 = 4 => "gint16",
        UInt16 = 5 => "guint16",
        Int32 = 6 => "gint32",
        UInt32 = 7 => "guint32",
        Int64 = 8 => "gint64",
        UInt64 = 9 => "guint64",
        Float = 10 => "gfloat",
        Double = 11 => "gdouble",
        GType = 12 => "GType",
        Utf8 = 13 => "utf8",
        Filename = 14 => "filename",
        Array = 15 => "array",
        Interface = 16 => "interface",
        GList = 17 => "GList",
        GSList = 18 => "GSList",
        GHash = 19 => "GHashTable",
        GError = 20 => "GError",
        UniChar = 21 => "gunichar",
    }
}

typelib_enum! {
    /// Container used by an `array` type.
    ArrayType, default = C {
        C = 0 => "c",
        Array = 1 => "array",
        PtrArray = 2 => "ptr_array",
        ByteArray = 3 => "byte_array",
    }
}

typelib_enum! {
    /// Data flow of an argument.
    Direction, default = In {
        In = 0 => "in",
        Out = 1 => "out",
        InOut = 2 => "inout",
    }
}

typelib_enum! {
    /// Ownership handed over with a value.
    Transfer, default = Nothing {
        Nothing = 0 => "none",
        Container = 1 => "container",
        Everything = 2 => "full",
    }
}

typelib_enum! {
    /// Lifetime of a callback argument.
    ScopeType, default = Invalid {
        Invalid = 0 => "invalid",
        Call = 1 => "call",
        Async = 2 => "async",
        Notified = 3 => "notified",
        Forever = 4 => "forever",
    }
}
