//! # source 模块说明
//!
//! ## 角色定位（Why）
//! - 解码器与分词器之间只有一个边界：[`RowSource::next_row`]；
//! - CSV、TSV、定宽等任意分词器只要能按行吐出文本字段即可接入，引号与转义规则不在本 crate 处理。
//!
//! ## 契约说明（What）
//! - `Ok(Some(row))`：下一行文本字段，按位置排列；
//! - `Ok(None)`：行来源耗尽；
//! - `Err(e)`：读取失败，解码器原样交还调用方。

use core::convert::Infallible;
use std::error::Error;

/// 逐行产出文本字段的行来源。
///
/// # 教案式说明
/// - **意图（Why）**：解码器只依赖这一能力，便于替换底层分词实现；
/// - **契约（What）**：实现是有状态的顺序流，每次调用推进一行；解码器独占持有行来源；
/// - **风险（Trade-offs）**：行以 `Vec<String>` 交付，每行一次分配，换取与分词器之间无生命周期耦合。
pub trait RowSource {
    /// 读取失败时的错误类型。
    type Error: Error + Send + Sync + 'static;

    /// 读取下一行。
    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    type Error = S::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).next_row()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    type Error = S::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).next_row()
    }
}

/// 把任意“行迭代器”适配为不会失败的行来源。
///
/// 每一行可以是任何能迭代出 `Into<String>` 元素的集合，例如 `Vec<&str>` 或 `[String; 3]`。
#[derive(Clone, Debug)]
pub struct IterRows<I> {
    rows: I,
}

impl<I: Iterator> IterRows<I> {
    /// 包装一组行。
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// 取回剩余的行迭代器。
    pub fn into_inner(self) -> I {
        self.rows
    }
}

impl<I, R> RowSource for IterRows<I>
where
    I: Iterator<Item = R>,
    R: IntoIterator,
    R::Item: Into<String>,
{
    type Error = Infallible;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self
            .rows
            .next()
            .map(|row| row.into_iter().map(Into::into).collect()))
    }
}

/// 把产出 `Result<行, E>` 的迭代器适配为行来源，`Err` 原样作为读取失败返回。
#[derive(Clone, Debug)]
pub struct FallibleRows<I> {
    rows: I,
}

impl<I: Iterator> FallibleRows<I> {
    /// 包装一组可能失败的行。
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I, R, E> RowSource for FallibleRows<I>
where
    I: Iterator<Item = Result<R, E>>,
    R: IntoIterator,
    R::Item: Into<String>,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        match self.rows.next() {
            None => Ok(None),
            Some(Ok(row)) => Ok(Some(row.into_iter().map(Into::into).collect())),
            Some(Err(err)) => Err(err),
        }
    }
}
