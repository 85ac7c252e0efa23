use core::fmt;
use std::collections::HashMap;

use crate::convert;
use crate::error::ConversionError;
use crate::kind::{FieldKind, FieldSlot};

/// 转换函数：把一段文本写入字段句柄。
///
/// 返回 `Err` 时字段已写入兜底值，见 [`convert`](crate::convert) 模块说明。
pub type Converter = fn(&mut FieldSlot<'_>, &str) -> Result<(), ConversionError>;

/// `Registry` 维护“字段类别 → 转换函数”的映射。
///
/// # 设计背景（Why）
/// - 解码器只认类别不认类型：同一注册表可以服务任意记录结构；
/// - 每个 [`Decoder`](crate::Decoder) 持有独立副本，不存在进程级共享的可变表。
///
/// # 行为逻辑（How）
/// - [`Registry::default`] 装入布尔、全部定宽整数（含 `isize`/`usize`）、`f32`/`f64` 与文本；
/// - `register` 新增或覆盖，返回被替换的旧函数，调用方可在新函数里继续委托；
/// - 转换函数均为 `fn` 指针，克隆成本低。
///
/// # 契约说明（What）
/// - **前置条件**：注册的函数必须遵守“先写后报”约定；
/// - **后置条件**：解码时若字段类别不在表内，返回 [`KindError`](crate::KindError)。
#[derive(Clone)]
pub struct Registry {
    converters: HashMap<FieldKind, Converter>,
}

impl Registry {
    /// 创建不含任何转换函数的空注册表。
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// 登记或覆盖某个类别的转换函数，返回被替换的旧函数。
    pub fn register(&mut self, kind: FieldKind, converter: Converter) -> Option<Converter> {
        let previous = self.converters.insert(kind, converter);
        if previous.is_some() {
            tracing::debug!(
                target: "spark_table::registry",
                kind = kind.name(),
                "converter overridden"
            );
        }
        previous
    }

    /// 移除某个类别的转换函数。
    pub fn remove(&mut self, kind: FieldKind) -> Option<Converter> {
        self.converters.remove(&kind)
    }

    /// 查找某个类别的转换函数。
    pub fn get(&self, kind: FieldKind) -> Option<Converter> {
        self.converters.get(&kind).copied()
    }

    /// 类别是否已登记。
    pub fn contains(&self, kind: FieldKind) -> bool {
        self.converters.contains_key(&kind)
    }

    /// 按 `Ord` 排序返回已登记的类别。
    pub fn kinds(&self) -> Vec<FieldKind> {
        let mut kinds: Vec<FieldKind> = self.converters.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// 已登记类别的数量。
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// 注册表是否为空。
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let defaults: [(FieldKind, Converter); 14] = [
            (FieldKind::Bool, convert::convert_bool),
            (FieldKind::Isize, convert::convert_isize),
            (FieldKind::I8, convert::convert_i8),
            (FieldKind::I16, convert::convert_i16),
            (FieldKind::I32, convert::convert_i32),
            (FieldKind::I64, convert::convert_i64),
            (FieldKind::Usize, convert::convert_usize),
            (FieldKind::U8, convert::convert_u8),
            (FieldKind::U16, convert::convert_u16),
            (FieldKind::U32, convert::convert_u32),
            (FieldKind::U64, convert::convert_u64),
            (FieldKind::F32, convert::convert_f32),
            (FieldKind::F64, convert::convert_f64),
            (FieldKind::Text, convert::convert_text),
        ];
        Self {
            converters: defaults.into_iter().collect(),
        }
    }
}
