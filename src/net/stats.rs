//! 统计信息
//!
//! 全局仿真统计：送达计数、路由错误、已计划迁移数。

#[derive(Debug, Default)]
pub struct Stats {
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    pub routing_errors: u64,
    pub migrations_planned: u64,
}
