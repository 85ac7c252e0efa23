//! 默认转换函数集合。
//!
//! # 契约说明（What）
//! - 每个函数签名都满足 [`Converter`](crate::Converter)：`fn(&mut FieldSlot<'_>, &str) -> Result<(), ConversionError>`；
//! - **先写后报**：即使文本无法解析，也会先把兜底值写入字段再返回错误：
//!   - 语法错误写入零值（`0`、`0.0`、`false`）；
//!   - 整数溢出写入目标宽度的饱和边界；
//!   - 有限文本溢出浮点宽度时写入 `±inf`。
//! - 布尔接受 `1 t T TRUE true True` 与 `0 f F FALSE false False`。
//!
//! 这些函数公开导出，调用方覆盖默认行为时可以在自定义转换函数里委托回来。

use core::num::IntErrorKind;
use core::str::FromStr;

use crate::error::ConversionError;
use crate::kind::{FieldKind, FieldSlot};

/// 整数解析的公共约束，暴露饱和边界。
trait SaturatingInt: FromStr<Err = core::num::ParseIntError> + Copy + Default {
    const MIN: Self;
    const MAX: Self;
    const SIGNED: bool;
}

macro_rules! saturating_int {
    ($signed:literal: $($ty:ty),*) => {
        $(
            impl SaturatingInt for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const SIGNED: bool = $signed;
            }
        )*
    };
}

saturating_int!(true: isize, i8, i16, i32, i64);
saturating_int!(false: usize, u8, u16, u32, u64);

fn parse_int<T: SaturatingInt>(kind: FieldKind, text: &str) -> (T, Result<(), ConversionError>) {
    // 无符号文本不接受任何符号前缀，`+5` 与 `-5` 同样按语法错误处理。
    if !T::SIGNED && text.starts_with('+') {
        return (T::default(), Err(ConversionError::syntax(kind, text)));
    }
    match text.parse::<T>() {
        Ok(value) => (value, Ok(())),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => (T::MAX, Err(ConversionError::out_of_range(kind, text))),
            IntErrorKind::NegOverflow => (T::MIN, Err(ConversionError::out_of_range(kind, text))),
            _ => (T::default(), Err(ConversionError::syntax(kind, text))),
        },
    }
}

macro_rules! int_converter {
    ($($(#[$doc:meta])* $name:ident => $variant:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(slot: &mut FieldSlot<'_>, text: &str) -> Result<(), ConversionError> {
                match slot {
                    FieldSlot::$variant(value) => {
                        let (parsed, outcome) = parse_int(FieldKind::$variant, text);
                        **value = parsed;
                        outcome
                    }
                    other => Err(ConversionError::mismatch(FieldKind::$variant, other.kind())),
                }
            }
        )*
    };
}

int_converter! {
    /// 解析平台宽度有符号整数。
    convert_isize => Isize;
    /// 解析 `i8`，范围 `-128..=127`。
    convert_i8 => I8;
    /// 解析 `i16`。
    convert_i16 => I16;
    /// 解析 `i32`。
    convert_i32 => I32;
    /// 解析 `i64`。
    convert_i64 => I64;
    /// 解析平台宽度无符号整数。
    convert_usize => Usize;
    /// 解析 `u8`；带符号前缀（`+`/`-`）的文本按语法错误处理。
    convert_u8 => U8;
    /// 解析 `u16`。
    convert_u16 => U16;
    /// 解析 `u32`。
    convert_u32 => U32;
    /// 解析 `u64`。
    convert_u64 => U64;
}

/// 文本是否显式拼写了无穷（`inf`/`infinity`，可带符号，大小写不敏感）。
fn spells_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! float_converter {
    ($($(#[$doc:meta])* $name:ident => $variant:ident, $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(slot: &mut FieldSlot<'_>, text: &str) -> Result<(), ConversionError> {
                match slot {
                    FieldSlot::$variant(value) => match text.parse::<$ty>() {
                        Ok(parsed) => {
                            **value = parsed;
                            if parsed.is_infinite() && !spells_infinity(text) {
                                Err(ConversionError::out_of_range(FieldKind::$variant, text))
                            } else {
                                Ok(())
                            }
                        }
                        Err(_) => {
                            **value = 0.0;
                            Err(ConversionError::syntax(FieldKind::$variant, text))
                        }
                    },
                    other => Err(ConversionError::mismatch(FieldKind::$variant, other.kind())),
                }
            }
        )*
    };
}

float_converter! {
    /// 以单精度解析十进制（可带指数）文本。
    convert_f32 => F32, f32;
    /// 以双精度解析十进制（可带指数）文本。
    convert_f64 => F64, f64;
}

/// 布尔文本的固定拼写集合。
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// 解析布尔字段；不在拼写集合内的文本写入 `false` 并报告语法错误。
pub fn convert_bool(slot: &mut FieldSlot<'_>, text: &str) -> Result<(), ConversionError> {
    match slot {
        FieldSlot::Bool(value) => match parse_bool(text) {
            Some(parsed) => {
                **value = parsed;
                Ok(())
            }
            None => {
                **value = false;
                Err(ConversionError::syntax(FieldKind::Bool, text))
            }
        },
        other => Err(ConversionError::mismatch(FieldKind::Bool, other.kind())),
    }
}

/// 文本字段仅做赋值，复用已有分配。
pub fn convert_text(slot: &mut FieldSlot<'_>, text: &str) -> Result<(), ConversionError> {
    match slot {
        FieldSlot::Text(value) => {
            value.clear();
            value.push_str(text);
            Ok(())
        }
        other => Err(ConversionError::mismatch(FieldKind::Text, other.kind())),
    }
}
