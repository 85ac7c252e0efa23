//! 解码器配置。
//!
//! [`DecoderOptions`] 支持 `serde` 反序列化，宿主可以把它嵌入自己的 TOML/JSON 配置：
//!
//! ```toml
//! [table]
//! parse_errors = "propagate"
//! ```

use serde::{Deserialize, Serialize};

/// 字段文本解析失败时的处理策略。
///
/// # 教案式说明
/// - **意图（Why）**：默认沿用“先写兜底值、不向调用方报告”的兼容行为，同时允许严格模式；
/// - **契约（What）**：两种策略下字段都已被写入兜底值，区别仅在于是否中断本次 `decode`；
/// - **风险（Trade-offs）**：`Ignore` 会让脏数据以零值形式进入记录，仅能通过 `warn` 日志发现。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorPolicy {
    /// 记录 `warn` 日志后继续处理后续字段。
    #[default]
    Ignore,
    /// 立即以 [`DecodeError::Parse`](crate::DecodeError::Parse) 结束本次调用。
    Propagate,
}

/// 解码器的可调参数。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// 解析失败策略。
    pub parse_errors: ParseErrorPolicy,
}

impl DecoderOptions {
    /// 设置解析失败策略。
    pub fn with_parse_errors(mut self, policy: ParseErrorPolicy) -> Self {
        self.parse_errors = policy;
        self
    }
}
