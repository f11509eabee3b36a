//! 数值工具：舍入、平均值、百分比
//!
//! 所有函数在输入无效时返回 `ValidationError`，不会静默产生 NaN/Infinity。

use crate::error::ValidationError;

/// 默认保留两位小数
pub const DEFAULT_PRECISION: i32 = 2;

/// 按指定精度舍入，0.5 向正无穷方向进位
pub fn round_to(value: f64, precision: i32) -> Result<f64, ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::NotANumber {
            context: "round_to",
            value,
        });
    }
    if precision < 0 {
        return Err(ValidationError::NegativePrecision(precision));
    }

    let factor = 10f64.powi(precision);
    Ok((value * factor + 0.5).floor() / factor)
}

/// 百分比 = round(value / total × 100, precision)
///
/// `total` 为 0 时报错
pub fn percentage(value: f64, total: f64, precision: i32) -> Result<f64, ValidationError> {
    for input in [value, total] {
        if !input.is_finite() {
            return Err(ValidationError::NotANumber {
                context: "percentage",
                value: input,
            });
        }
    }
    if precision < 0 {
        return Err(ValidationError::NegativePrecision(precision));
    }
    if total == 0.0 {
        return Err(ValidationError::ZeroDenominator {
            context: "percentage",
        });
    }

    round_to(value / total * 100.0, precision)
}

/// 平均值 = round(total / count, 2)，`count` 为 0 时报错
pub fn average(total: f64, count: usize, context: &'static str) -> Result<f64, ValidationError> {
    if count == 0 {
        return Err(ValidationError::ZeroDenominator { context });
    }
    round_to(total / count as f64, DEFAULT_PRECISION)
}
