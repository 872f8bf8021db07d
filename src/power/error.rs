//! 过载检测错误

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PowerError {
    /// 非零前缀采样不足，统计量不可靠，拒绝计算。
    /// 调用方本 tick 跳过该主机的过载检查，或回退到静态阈值。
    #[error("insufficient utilization history: {got} non-zero leading samples, need {need}")]
    InsufficientHistory { got: usize, need: usize },
}
