//! # decoder 模块说明
//!
//! ## 角色定位（Why）
//! - 把行来源产出的文本字段按位置写入记录字段，是本 crate 的核心；
//! - 对形状不符、类别缺失、文本解析失败给出结构化错误，调用方可以逐行决定是否继续。
//!
//! ## 流程概览（How）
//! 1. 读取下一行；结束或失败原样返回；
//! 2. 取目标的 [`RecordShape`]，非记录直接成功；
//! 3. 按声明顺序遍历字段，跳过不可写字段，游标只在可写字段上前进；
//! 4. 遍历结束后若行内仍有剩余文本，报告多余字段。
//!
//! ## 并发模型（What）
//! - `decode` 需要 `&mut self`，同一解码器天然不能被并发调用；
//! - 需要并行时按分片各自构造“行来源 + 解码器”。

use core::marker::PhantomData;

use crate::error::{ConversionError, DecodeError, KindError, ParseError, RowShapeError};
use crate::kind::FieldKind;
use crate::options::{DecoderOptions, ParseErrorPolicy};
use crate::record::{FieldDescriptor, Record, RecordShape};
use crate::registry::Registry;
use crate::source::RowSource;

const TARGET: &str = "spark_table::decoder";

/// 按位置把文本行解码为记录的解码器。
///
/// # 教案式说明
/// - **意图（Why）**：一个解码器对应一个行来源，跨多次 `decode` 复用，自身不保存任何逐行状态；
/// - **执行（How）**：构造时装入默认注册表；调用方可在首次解码前通过 [`Decoder::registry_mut`]
///   新增或覆盖转换函数；
/// - **契约（What）**：
///   - 成功时目标的全部可写字段已按行内顺序写入；
///   - 失败时目标保留失败点之前已完成的写入；
///   - 目标不是记录时，行依旧被消费，目标保持原样并返回 `Ok(())`。
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    registry: Registry,
    options: DecoderOptions,
}

impl<S: RowSource> Decoder<S> {
    /// 以默认注册表与默认配置构造解码器。
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    /// 以默认注册表与指定配置构造解码器。
    pub fn with_options(source: S, options: DecoderOptions) -> Self {
        Self {
            source,
            registry: Registry::default(),
            options,
        }
    }

    /// 当前注册表。
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 可变注册表，用于新增或覆盖转换函数。
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// 当前配置。
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// 可变配置。
    pub fn options_mut(&mut self) -> &mut DecoderOptions {
        &mut self.options
    }

    /// 借出底层行来源。
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// 交还底层行来源。
    pub fn into_source(self) -> S {
        self.source
    }

    /// 读取下一行并写入 `target`。
    ///
    /// # 契约说明（What）
    /// - 行来源结束：[`DecodeError::EndOfStream`]；读取失败：[`DecodeError::Stream`]；
    /// - 行过短：在首个拿不到文本的可写字段处返回 [`RowShapeError`]，`missing_field` 为该字段名；
    /// - 类别未登记：返回 [`KindError`]，之前的字段保持已写入；
    /// - 行过长：全部字段写完后返回 [`RowShapeError`]，`missing_field` 为 `None`；
    /// - 文本解析失败：按 [`ParseErrorPolicy`] 忽略或返回 [`DecodeError::Parse`]。
    pub fn decode<T>(&mut self, target: &mut T) -> Result<(), DecodeError<S::Error>>
    where
        T: Record + ?Sized,
    {
        let row = match self.source.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => return Err(DecodeError::EndOfStream),
            Err(err) => return Err(DecodeError::Stream(err)),
        };

        let Some(shape) = target.shape() else {
            tracing::trace!(
                target: TARGET,
                row_len = row.len(),
                "target is not a record, row skipped"
            );
            return Ok(());
        };

        self.fill(shape, target, &row)
    }

    fn fill<T>(
        &self,
        shape: &'static RecordShape,
        target: &mut T,
        row: &[String],
    ) -> Result<(), DecodeError<S::Error>>
    where
        T: Record + ?Sized,
    {
        let mut cursor = 0;
        for (index, field) in shape.fields().iter().enumerate() {
            let Some(kind) = field.kind() else {
                continue;
            };

            let Some(text) = row.get(cursor) else {
                tracing::debug!(
                    target: TARGET,
                    record = shape.name(),
                    row_len = row.len(),
                    matched_len = cursor,
                    missing_field = field.name(),
                    "row shorter than record"
                );
                return Err(RowShapeError {
                    row_len: row.len(),
                    matched_len: cursor,
                    missing_field: Some(field.name()),
                }
                .into());
            };

            let Some(converter) = self.registry.get(kind) else {
                tracing::debug!(
                    target: TARGET,
                    record = shape.name(),
                    field = field.name(),
                    kind = kind.name(),
                    "field kind has no converter"
                );
                return Err(KindError {
                    kind,
                    field: field.name(),
                }
                .into());
            };

            let outcome = match target.field_slot(index) {
                Some(mut slot) => converter(&mut slot, text),
                None => Err(ConversionError::SlotUnavailable { kind }),
            };
            cursor += 1;

            if let Err(source) = outcome {
                self.on_conversion_failure(shape, field, kind, text, source)?;
            }
        }

        if cursor < row.len() {
            tracing::debug!(
                target: TARGET,
                record = shape.name(),
                row_len = row.len(),
                matched_len = cursor,
                "row longer than record"
            );
            return Err(RowShapeError {
                row_len: row.len(),
                matched_len: cursor,
                missing_field: None,
            }
            .into());
        }

        tracing::trace!(target: TARGET, record = shape.name(), fields = cursor, "row decoded");
        Ok(())
    }

    fn on_conversion_failure(
        &self,
        shape: &RecordShape,
        field: &FieldDescriptor,
        kind: FieldKind,
        text: &str,
        source: ConversionError,
    ) -> Result<(), DecodeError<S::Error>> {
        match self.options.parse_errors {
            ParseErrorPolicy::Ignore => {
                tracing::warn!(
                    target: TARGET,
                    record = shape.name(),
                    field = field.name(),
                    kind = kind.name(),
                    text,
                    error = %source,
                    "field conversion failed, keeping fallback value"
                );
                Ok(())
            }
            ParseErrorPolicy::Propagate => Err(ParseError {
                field: field.name(),
                kind,
                text: text.to_owned(),
                source,
            }
            .into()),
        }
    }

    /// 逐行解码为新记录的迭代器。
    ///
    /// # 契约说明（What）
    /// - 每行以 `T::default()` 为起点解码；
    /// - 行来源结束时迭代器正常结束，不会产出 `EndOfStream`；
    /// - 形状、类别、解析错误只影响当前行，迭代可以继续；行来源读取失败后迭代器终止。
    pub fn records<T>(&mut self) -> Records<'_, S, T>
    where
        T: Record + Default,
    {
        Records {
            decoder: self,
            finished: false,
            _marker: PhantomData,
        }
    }

    /// 解码剩余全部行，遇到首个错误即返回。
    pub fn decode_all<T>(&mut self) -> Result<Vec<T>, DecodeError<S::Error>>
    where
        T: Record + Default,
    {
        self.records().collect()
    }
}

/// [`Decoder::records`] 返回的迭代器。
#[derive(Debug)]
pub struct Records<'d, S, T> {
    decoder: &'d mut Decoder<S>,
    finished: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<S, T> Iterator for Records<'_, S, T>
where
    S: RowSource,
    T: Record + Default,
{
    type Item = Result<T, DecodeError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = T::default();
        match self.decoder.decode(&mut record) {
            Ok(()) => Some(Ok(record)),
            Err(DecodeError::EndOfStream) => {
                self.finished = true;
                None
            }
            Err(err @ DecodeError::Stream(_)) => {
                self.finished = true;
                Some(Err(err))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
