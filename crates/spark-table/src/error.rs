//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义解码路径上的全部结构化错误，调用方可按变体精确分流；
//! - 所有错误对当前 `decode` 调用均为终止性的，核心内部不做重试。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，与 `std::error::Error` 生态兼容；
//! - 行来源的错误原样透传（[`DecodeError::Stream`]），不做二次包装；
//! - 行尾结束以独立变体 [`DecodeError::EndOfStream`] 表达，供调用方终止解码循环。

use core::fmt;

use thiserror::Error;

use crate::kind::FieldKind;

/// 单次 `decode` 调用的错误域。
///
/// # 教案式说明
/// - **意图（Why）**：把“行来源失败”“行形状不符”“类别不可解码”“文本转换失败”四类路径收敛到一个枚举；
/// - **契约（What）**：`E` 为行来源的错误类型；`Stream` 以 `transparent` 形式保留其 `Display` 与 `source`；
/// - **风险（Trade-offs）**：`EndOfStream` 也以 `Err` 返回，循环调用方需先用
///   [`DecodeError::is_end_of_stream`] 区分正常结束与真实失败。
#[derive(Debug, Error)]
pub enum DecodeError<E> {
    /// 行来源已耗尽。
    #[error("end of row stream")]
    EndOfStream,

    /// 行来源读取失败，原样透传。
    #[error(transparent)]
    Stream(E),

    /// 行字段数与记录的可写字段数不一致。
    #[error(transparent)]
    RowShape(#[from] RowShapeError),

    /// 可写字段的类别没有注册转换函数。
    #[error(transparent)]
    Kind(#[from] KindError),

    /// 文本转换失败；仅在 [`ParseErrorPolicy::Propagate`](crate::ParseErrorPolicy::Propagate) 下出现。
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl<E> DecodeError<E> {
    /// 是否为行来源结束信号。
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, DecodeError::EndOfStream)
    }

    /// 若为形状错误则返回其详情。
    pub fn as_row_shape(&self) -> Option<&RowShapeError> {
        match self {
            DecodeError::RowShape(err) => Some(err),
            _ => None,
        }
    }

    /// 若为类别错误则返回其详情。
    pub fn as_kind(&self) -> Option<&KindError> {
        match self {
            DecodeError::Kind(err) => Some(err),
            _ => None,
        }
    }
}

/// 行长度与记录可写字段数不一致。
///
/// # 教案式说明
/// - **契约（What）**：
///   - 行过短：`matched_len == row_len`，`missing_field` 为首个没有拿到文本的可写字段；
///   - 行过长：`matched_len` 等于记录的可写字段总数，`missing_field` 为 `None`。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error(
    "row mismatch: row length = {row_len}, but struct length = {matched_len}{suffix}",
    suffix = MissingFieldSuffix(.missing_field)
)]
pub struct RowShapeError {
    /// 当前行的文本字段数。
    pub row_len: usize,
    /// 已成功匹配的可写字段数。
    pub matched_len: usize,
    /// 行过短时首个未匹配字段的名称。
    pub missing_field: Option<&'static str>,
}

struct MissingFieldSuffix<'a>(&'a Option<&'static str>);

impl fmt::Display for MissingFieldSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, " (field {name})"),
            None => Ok(()),
        }
    }
}

/// 可写字段的类别在注册表中缺失。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} is not decodable (field {field})")]
pub struct KindError {
    /// 不受支持的类别。
    pub kind: FieldKind,
    /// 触发错误的字段名。
    pub field: &'static str,
}

/// 某个字段的文本转换失败。
///
/// 字段在报告前已经被写入转换函数给出的兜底值。
#[derive(Clone, Debug, PartialEq, Error)]
#[error("cannot decode field {field} from {text:?}")]
pub struct ParseError {
    /// 字段名。
    pub field: &'static str,
    /// 字段类别。
    pub kind: FieldKind,
    /// 原始文本。
    pub text: String,
    /// 转换函数报告的底层原因。
    #[source]
    pub source: ConversionError,
}

/// 转换函数的失败原因。
///
/// # 教案式说明
/// - **意图（Why）**：内置转换函数与调用方自定义转换函数共用同一错误类型，便于统一记录与传播；
/// - **契约（What）**：返回该错误时转换函数**已经**写入兜底值（零值或饱和边界）；
/// - **风险（Trade-offs）**：`SlotMismatch`/`SlotUnavailable` 代表 `Record` 实现与描述不一致，属于编程错误，
///   但仍按解析失败策略处理，不会触发 panic。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// 文本不符合目标类别的语法，字段被写入零值。
    #[error("invalid {kind} syntax: {text:?}")]
    Syntax {
        /// 目标类别。
        kind: FieldKind,
        /// 原始文本。
        text: String,
    },

    /// 数值超出目标宽度，字段被写入饱和值。
    #[error("value out of range for {kind}: {text:?}")]
    OutOfRange {
        /// 目标类别。
        kind: FieldKind,
        /// 原始文本。
        text: String,
    },

    /// 转换函数收到的句柄与登记的类别不一致。
    #[error("converter for {expected} received a {found} field")]
    SlotMismatch {
        /// 转换函数期望的类别。
        expected: FieldKind,
        /// 实际句柄的类别。
        found: FieldKind,
    },

    /// 记录声明了可写字段却没有提供句柄。
    #[error("record exposes no slot for {kind} field")]
    SlotUnavailable {
        /// 字段声明的类别。
        kind: FieldKind,
    },

    /// 自定义转换函数报告的失败。
    #[error("{kind}: {message}")]
    Custom {
        /// 目标类别。
        kind: FieldKind,
        /// 人类可读的说明。
        message: String,
    },
}

impl ConversionError {
    /// 为自定义转换函数构造错误。
    pub fn custom(kind: FieldKind, message: impl Into<String>) -> Self {
        ConversionError::Custom {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn syntax(kind: FieldKind, text: &str) -> Self {
        ConversionError::Syntax {
            kind,
            text: text.to_owned(),
        }
    }

    pub(crate) fn out_of_range(kind: FieldKind, text: &str) -> Self {
        ConversionError::OutOfRange {
            kind,
            text: text.to_owned(),
        }
    }

    pub(crate) fn mismatch(expected: FieldKind, found: FieldKind) -> Self {
        ConversionError::SlotMismatch { expected, found }
    }
}
