#![warn(missing_docs)]

//! `spark-table` 把分隔文本的逐行字段按位置解码为静态已知的记录结构。
//!
//! # 教案背景（Why）
//! - 行分词（CSV 引号、转义等）交给外部实现，本 crate 只消费“下一行”能力，聚焦类型驱动的字段写入；
//! - 记录形状由 `#[derive(Record)]` 在编译期生成，不依赖运行时反射；
//! - 形状不符、类别缺失、解析失败均以结构化错误返回，调用方可逐行决定是否继续。
//!
//! # 使用概览（How）
//! ```
//! use spark_table::{Decoder, IterRows, Record};
//!
//! #[derive(Debug, Default, Record)]
//! struct X {
//!     pub a: i32,
//!     pub b: String,
//!     c: i32,
//! }
//!
//! let rows = IterRows::new(vec![vec!["1", "blonde"], vec!["2", "on"]]);
//! let mut dec = Decoder::new(rows);
//! loop {
//!     let mut x = X::default();
//!     match dec.decode(&mut x) {
//!         Ok(()) => println!("{} {} {}", x.a, x.b, x.c),
//!         Err(err) if err.is_end_of_stream() => break,
//!         Err(err) => panic!("oops: {err}"),
//!     }
//! }
//! ```
//!
//! # 契约说明（What）
//! - 只有 `pub` 字段参与解码，私有字段与 `#[table(skip)]` 字段既不写入也不消耗文本；
//! - 默认注册表覆盖布尔、定宽整数、`f32`/`f64` 与 `String`，其余类别需通过
//!   [`Decoder::registry_mut`] 登记转换函数；
//! - 目标不是记录（例如 `i32`）时 `decode` 静默成功。
//!
//! # 风险提示（Trade-offs）
//! - 默认的 [`ParseErrorPolicy::Ignore`] 会把无法解析的文本写成零值并只记录 `warn` 日志，
//!   需要严格校验时切换到 [`ParseErrorPolicy::Propagate`]。

pub mod convert;
mod decoder;
mod error;
mod kind;
mod options;
mod record;
mod registry;
mod source;

pub use crate::decoder::{Decoder, Records};
pub use crate::error::{ConversionError, DecodeError, KindError, ParseError, RowShapeError};
pub use crate::kind::{FieldKind, FieldSlot, FieldValue};
pub use crate::options::{DecoderOptions, ParseErrorPolicy};
pub use crate::record::{FieldAccess, FieldDescriptor, Record, RecordShape};
pub use crate::registry::{Converter, Registry};
pub use crate::source::{FallibleRows, IterRows, RowSource};

/// 为结构体派生 [`Record`](trait@Record)，支持 `#[table(skip)]` 与 `#[table(rename = "...")]`。
#[cfg(feature = "derive")]
pub use spark_table_macros::Record;
