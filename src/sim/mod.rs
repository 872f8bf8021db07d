//! 仿真核心模块
//!
//! 此模块包含离散事件仿真的核心组件：仿真时间、事件、世界、仿真器，
//! 以及数据中心场景描述（serde 配置）。

// 子模块声明
mod config;
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use config::{
    DatacenterSpec, FlowSpec, MigrationSpec, SpecError, TopologySpec, VmSpec,
};
pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
