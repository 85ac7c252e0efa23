//! 集成测试共用的行来源。
//!
//! `LineRows` 按换行切分文本、跳过空行、再按逗号切分字段，不处理引号与转义，
//! 仅用于在测试中模拟外部分词器。

#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Cursor, Read};

use spark_table::RowSource;

/// 逗号分隔、逐行读取的测试行来源。
pub struct LineRows<R> {
    reader: BufReader<R>,
    line: String,
}

impl<R: Read> LineRows<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: String::new(),
        }
    }
}

impl LineRows<Cursor<Vec<u8>>> {
    pub fn from_text(text: &str) -> Self {
        Self::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: Read> RowSource for LineRows<R> {
    type Error = io::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            let trimmed = self.line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(trimmed.split(',').map(str::to_owned).collect()));
        }
    }
}

/// 读取到第 `fail_at` 行时返回 I/O 错误的行来源。
pub struct FlakyRows {
    pub served: usize,
    pub fail_at: usize,
}

impl RowSource for FlakyRows {
    type Error = io::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        if self.served == self.fail_at {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        self.served += 1;
        Ok(Some(vec![self.served.to_string(), "row".to_owned()]))
    }
}
