//! 过载检测与迁移触发模块
//!
//! 从主机利用率历史计算抗离群的动态过载阈值（四分位距），
//! 并据此决定是否触发 VM 迁移。选哪台 VM、迁到哪里由外部注入的
//! 策略决定，本模块只做判定与分发。

// 子模块声明
mod detector;
mod error;
mod math;
mod threshold;
mod trigger;

// 重新导出公共接口
pub use detector::{IqrOverloadDetector, MIN_HISTORY_LEN};
pub use error::PowerError;
pub use math::{count_non_zero_beginning, iqr, quartile};
pub use threshold::OverUtilizationThreshold;
pub use trigger::{
    FallbackPlacementPolicy, FirstFitFallback, FirstVmSelection, Migration, MigrationDecision,
    MigrationTrigger, VmSelectionPolicy,
};
