//! 世界 trait
//!
//! 定义仿真世界接口，由业务层实现（数据中心拓扑/主机/统计等）。

use super::simulator::Simulator;
use std::any::Any;

pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
