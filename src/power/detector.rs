//! 过载统计量检测器
//!
//! 从主机利用率历史快照计算 IQR 统计量。历史变化会使结果失效，
//! 因此每次调用都重新计算，从不跨快照缓存。

use tracing::trace;

use super::error::PowerError;
use super::math::{count_non_zero_beginning, iqr};

/// 可靠统计所需的最少非零前缀采样数。低于它的统计量不可信，
/// 会造成虚假迁移。
pub const MIN_HISTORY_LEN: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct IqrOverloadDetector {
    min_history: usize,
}

impl Default for IqrOverloadDetector {
    fn default() -> Self {
        Self {
            min_history: MIN_HISTORY_LEN,
        }
    }
}

impl IqrOverloadDetector {
    pub fn new(min_history: usize) -> Self {
        Self { min_history }
    }

    /// 由利用率历史计算阈值统计量（IQR，≥ 0）。
    ///
    /// 非零前缀采样数不足时返回 [`PowerError::InsufficientHistory`]；
    /// 如何补救（跳过检查还是回退静态阈值）是调用方的策略。
    pub fn compute_threshold_measure(&self, history: &[f64]) -> Result<f64, PowerError> {
        let got = count_non_zero_beginning(history);
        if got < self.min_history {
            return Err(PowerError::InsufficientHistory {
                got,
                need: self.min_history,
            });
        }
        let measure = iqr(history);
        trace!(samples = history.len(), measure, "IQR 统计量");
        Ok(measure)
    }
}
