//! # kind 模块说明
//!
//! ## 角色定位（Why）
//! - 为解码器提供封闭的字段类别枚举 [`FieldKind`]，注册表以此为键挑选转换函数；
//! - 以 [`FieldSlot`] 表达“某个记录字段的可写句柄”，替代运行时反射。
//!
//! ## 契约说明（What）
//! - 标量类别（布尔、定宽整数、浮点、字符、文本）是默认注册表的覆盖范围（`char` 除外）；
//! - `I128`/`U128` 与 `Sequence`/`Map`/`Optional`/`Record` 仅用于类别报告，默认不可解码，
//!   解码到这些字段时返回携带类别的 `KindError`；
//! - `Custom(name)` 留给调用方的自定义标量类型，需要先向注册表登记转换函数。

use core::any::Any;
use core::fmt;
use std::collections::{BTreeMap, HashMap};

/// 字段类别标签。
///
/// # 教案式说明
/// - **意图（Why）**：注册表只关心“如何把文本写入某类字段”，与具体记录类型无关；
/// - **契约（What）**：`Display` 输出 Rust 类型名（如 `i8`、`String`），`Custom` 输出调用方给定的名称；
/// - **风险（Trade-offs）**：`Custom` 以名称区分，不同类型若复用同一名称会共享同一转换函数。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// 平台宽度有符号整数 `isize`。
    Isize,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`，默认注册表不覆盖。
    I128,
    /// 平台宽度无符号整数 `usize`。
    Usize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`，默认注册表不覆盖。
    U128,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `char`，默认注册表不覆盖。
    Char,
    /// `String`
    Text,
    /// 序列类字段（`Vec<T>`），仅用于类别报告。
    Sequence,
    /// 映射类字段（`HashMap`/`BTreeMap`），仅用于类别报告。
    Map,
    /// 可空字段（`Option<T>`），仅用于类别报告。
    Optional,
    /// 嵌套记录字段（另一个 `#[derive(Record)]` 结构体），仅用于类别报告。
    Record,
    /// 调用方自定义的标量类别。
    Custom(&'static str),
}

impl FieldKind {
    /// 返回类别的展示名称。
    pub const fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Isize => "isize",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::I128 => "i128",
            FieldKind::Usize => "usize",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::U128 => "u128",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Char => "char",
            FieldKind::Text => "String",
            FieldKind::Sequence => "sequence",
            FieldKind::Map => "map",
            FieldKind::Optional => "option",
            FieldKind::Record => "struct",
            FieldKind::Custom(name) => name,
        }
    }

    /// 是否为标量类别；`Sequence`/`Map`/`Optional`/`Record` 返回 `false`。
    pub const fn is_scalar(&self) -> bool {
        !matches!(
            self,
            FieldKind::Sequence | FieldKind::Map | FieldKind::Optional | FieldKind::Record
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 指向单个记录字段的可写句柄。
///
/// # 教案式说明
/// - **意图（Why）**：转换函数通过模式匹配取得具体类型的 `&mut`，无需 `unsafe` 或反射；
/// - **契约（What）**：句柄生命周期受记录的可变借用约束，解码器在每个字段处理完毕后立即释放；
/// - **执行（How）**：非内置类别统一走 [`FieldSlot::Dynamic`]，由转换函数自行 `downcast_mut`。
pub enum FieldSlot<'a> {
    /// `bool` 字段。
    Bool(&'a mut bool),
    /// `isize` 字段。
    Isize(&'a mut isize),
    /// `i8` 字段。
    I8(&'a mut i8),
    /// `i16` 字段。
    I16(&'a mut i16),
    /// `i32` 字段。
    I32(&'a mut i32),
    /// `i64` 字段。
    I64(&'a mut i64),
    /// `usize` 字段。
    Usize(&'a mut usize),
    /// `u8` 字段。
    U8(&'a mut u8),
    /// `u16` 字段。
    U16(&'a mut u16),
    /// `u32` 字段。
    U32(&'a mut u32),
    /// `u64` 字段。
    U64(&'a mut u64),
    /// `f32` 字段。
    F32(&'a mut f32),
    /// `f64` 字段。
    F64(&'a mut f64),
    /// `char` 字段。
    Char(&'a mut char),
    /// `String` 字段。
    Text(&'a mut String),
    /// 其余类别：携带类别标签与类型擦除的可变引用。
    Dynamic {
        /// 字段类别。
        kind: FieldKind,
        /// 字段值本身。
        value: &'a mut dyn Any,
    },
}

impl FieldSlot<'_> {
    /// 返回句柄对应的字段类别。
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSlot::Bool(_) => FieldKind::Bool,
            FieldSlot::Isize(_) => FieldKind::Isize,
            FieldSlot::I8(_) => FieldKind::I8,
            FieldSlot::I16(_) => FieldKind::I16,
            FieldSlot::I32(_) => FieldKind::I32,
            FieldSlot::I64(_) => FieldKind::I64,
            FieldSlot::Usize(_) => FieldKind::Usize,
            FieldSlot::U8(_) => FieldKind::U8,
            FieldSlot::U16(_) => FieldKind::U16,
            FieldSlot::U32(_) => FieldKind::U32,
            FieldSlot::U64(_) => FieldKind::U64,
            FieldSlot::F32(_) => FieldKind::F32,
            FieldSlot::F64(_) => FieldKind::F64,
            FieldSlot::Char(_) => FieldKind::Char,
            FieldSlot::Text(_) => FieldKind::Text,
            FieldSlot::Dynamic { kind, .. } => *kind,
        }
    }

    /// 将 `Dynamic` 句柄还原为具体类型；内置类别或类型不符时返回 `None`。
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            FieldSlot::Dynamic { value, .. } => value.downcast_mut::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldSlot").field(&self.kind()).finish()
    }
}

/// 可作为记录字段参与解码的值类型。
///
/// # 教案式说明
/// - **意图（Why）**：`#[derive(Record)]` 在编译期通过 `<T as FieldValue>::KIND` 取得字段类别，
///   并以 [`FieldValue::slot`] 生成可写句柄；
/// - **契约（What）**：`slot` 返回的句柄类别必须等于 `KIND`，否则转换函数会报告 `SlotMismatch`；
/// - **扩展（How）**：自定义类型声明 `KIND = FieldKind::Custom("...")` 并返回
///   `FieldSlot::Dynamic { kind: Self::KIND, value: self }`，再向注册表登记同名类别的转换函数。
pub trait FieldValue {
    /// 该类型对应的字段类别。
    const KIND: FieldKind;

    /// 生成指向自身的可写句柄。
    fn slot(&mut self) -> FieldSlot<'_>;
}

macro_rules! impl_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = FieldKind::$variant;

                fn slot(&mut self) -> FieldSlot<'_> {
                    FieldSlot::$variant(self)
                }
            }
        )*
    };
}

impl_field_value! {
    bool => Bool,
    isize => Isize,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    usize => Usize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => Text,
}

macro_rules! impl_dynamic_field_value {
    ($([$($generics:tt)*] $ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<$($generics)*> FieldValue for $ty {
                const KIND: FieldKind = FieldKind::$variant;

                fn slot(&mut self) -> FieldSlot<'_> {
                    FieldSlot::Dynamic {
                        kind: Self::KIND,
                        value: self,
                    }
                }
            }
        )*
    };
}

impl_dynamic_field_value! {
    [] i128 => I128,
    [] u128 => U128,
    [T: Any] Vec<T> => Sequence,
    [K: Any, V: Any, H: Any] HashMap<K, V, H> => Map,
    [K: Any, V: Any] BTreeMap<K, V> => Map,
    [T: Any] Option<T> => Optional,
}
