//! 动态过载阈值策略
//!
//! 把检测器的统计量与安全系数组合成实际触发阈值：
//! `1 − safety × measure`。安全系数越大阈值越低，迁移越激进。
//! 历史不足时回退到静态阈值——回退是显式的调用方策略，
//! 不藏在检测器里。

use tracing::debug;

use super::detector::IqrOverloadDetector;
use super::error::PowerError;

#[derive(Debug, Clone, Copy)]
pub struct OverUtilizationThreshold {
    safety: f64,
    static_threshold: f64,
}

impl OverUtilizationThreshold {
    pub fn new(safety: f64, static_threshold: f64) -> Self {
        Self {
            safety,
            static_threshold,
        }
    }

    pub fn safety(&self) -> f64 {
        self.safety
    }

    /// 由利用率历史得到触发阈值。
    pub fn threshold(&self, detector: &IqrOverloadDetector, history: &[f64]) -> f64 {
        match detector.compute_threshold_measure(history) {
            Ok(measure) => 1.0 - self.safety * measure,
            Err(PowerError::InsufficientHistory { got, need }) => {
                debug!(got, need, fallback = self.static_threshold, "历史不足，回退静态阈值");
                self.static_threshold
            }
        }
    }
}
