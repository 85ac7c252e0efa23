//! # record 模块说明
//!
//! ## 角色定位（Why）
//! - 以编译期生成的静态描述替代运行时反射：[`RecordShape`] 记录字段顺序、名称、类别与可写性；
//! - [`Record`] 是解码目标的唯一入口，既能描述记录，也能声明“我不是记录”。
//!
//! ## 契约说明（What）
//! - 字段顺序即声明顺序，解码严格按位置匹配；
//! - `Skipped` 字段不消耗行内文本；
//! - `shape()` 返回 `None` 的目标被视为非记录，解码时静默跳过。

use std::collections::{BTreeMap, HashMap};

use crate::kind::{FieldKind, FieldSlot};

/// 字段的可写性与类别。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldAccess {
    /// 可写字段，携带其类别。
    Settable(FieldKind),
    /// 不可写字段（私有或显式跳过），解码器不触碰也不消耗文本。
    Skipped,
}

/// 单个字段的静态描述。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    access: FieldAccess,
}

impl FieldDescriptor {
    /// 描述一个可写字段。
    pub const fn settable(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            access: FieldAccess::Settable(kind),
        }
    }

    /// 描述一个被跳过的字段。
    pub const fn skipped(name: &'static str) -> Self {
        Self {
            name,
            access: FieldAccess::Skipped,
        }
    }

    /// 字段名，出现在错误信息中。
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// 字段的可写性与类别。
    pub const fn access(&self) -> FieldAccess {
        self.access
    }

    /// 可写字段的类别；跳过字段返回 `None`。
    pub const fn kind(&self) -> Option<FieldKind> {
        match self.access {
            FieldAccess::Settable(kind) => Some(kind),
            FieldAccess::Skipped => None,
        }
    }

    /// 是否可写。
    pub const fn is_settable(&self) -> bool {
        matches!(self.access, FieldAccess::Settable(_))
    }
}

/// 记录类型的完整形状。
///
/// # 教案式说明
/// - **意图（Why）**：形状在编译期以 `static` 形式生成一次，解码时零分配地遍历；
/// - **契约（What）**：`fields` 与记录的声明顺序一致，下标与 [`Record::field_slot`] 的 `index` 一一对应；
/// - **风险（Trade-offs）**：手写 `Record` 时若两者下标不一致，转换函数会报告 `SlotMismatch`/`SlotUnavailable`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordShape {
    name: &'static str,
    fields: &'static [FieldDescriptor],
}

impl RecordShape {
    /// 以类型名与字段列表构造形状。
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }

    /// 记录类型名。
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// 按声明顺序排列的全部字段。
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// 可写字段数量，即一行应当包含的文本字段数。
    pub fn settable_len(&self) -> usize {
        self.fields.iter().filter(|field| field.is_settable()).count()
    }

    /// 按声明顺序迭代可写字段及其在 `fields` 中的下标。
    pub fn settable(&self) -> impl Iterator<Item = (usize, &'static FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_settable())
    }
}

/// 解码目标。
///
/// # 教案式说明
/// - **意图（Why）**：解码器以 `&mut T where T: Record + ?Sized` 接收目标，泛型调用点无需预先知道目标是否为记录；
/// - **执行（How）**：`#[derive(Record)]` 生成 `shape` 与基于 `match` 的 `field_slot`；
///   标量与容器类型使用默认实现，表示“非记录”；
/// - **契约（What）**：
///   - `shape()` 返回 `Some` 时，对每个 `Settable` 下标 `field_slot` 必须返回同类别的句柄；
///   - 默认实现返回 `None`，解码器据此把调用视为无操作。
pub trait Record {
    /// 记录形状；非记录返回 `None`。
    fn shape(&self) -> Option<&'static RecordShape> {
        None
    }

    /// 第 `index` 个字段的可写句柄。
    fn field_slot(&mut self, index: usize) -> Option<FieldSlot<'_>> {
        let _ = index;
        None
    }
}

macro_rules! non_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {})*
    };
}

non_record!(
    (),
    bool,
    isize,
    i8,
    i16,
    i32,
    i64,
    i128,
    usize,
    u8,
    u16,
    u32,
    u64,
    u128,
    f32,
    f64,
    char,
    String,
    str,
);

impl<T> Record for Vec<T> {}
impl<T> Record for [T] {}
impl<T> Record for Option<T> {}
impl<K, V, S> Record for HashMap<K, V, S> {}
impl<K, V> Record for BTreeMap<K, V> {}

impl<R: Record + ?Sized> Record for Box<R> {
    fn shape(&self) -> Option<&'static RecordShape> {
        (**self).shape()
    }

    fn field_slot(&mut self, index: usize) -> Option<FieldSlot<'_>> {
        (**self).field_slot(index)
    }
}
