//! 数据中心网络模块
//!
//! 此模块包含网络仿真的核心组件：标识、数据包、批量时延模型、
//! 分层交换机路由状态机、VM 放置查询、主机与世界。

// 子模块声明
mod dc_world;
mod delay;
mod error;
mod events;
mod host;
mod id;
mod packet;
mod placement;
mod stats;
mod switch;

// 重新导出公共接口
pub use dc_world::DcWorld;
pub use delay::batch_delay;
pub use error::NetError;
pub use events::{ForwardTick, HostDelivery, PacketDown, PacketUp};
pub use host::NetworkHost;
pub use id::{HostId, SwitchId, VmId};
pub use packet::NetworkPacket;
pub use placement::{PlacementOracle, VmPlacement};
pub use stats::Stats;
pub use switch::{
    FirstConfigured, HashBased, SwitchLevel, SwitchNode, SwitchOpts, UplinkPolicy,
    AGG_DOWNLINK_BPS, AGG_PORTS, AGG_SWITCHING_DELAY_SECS, EDGE_DOWNLINK_BPS, EDGE_PORTS,
    EDGE_SWITCHING_DELAY_SECS, ROOT_DOWNLINK_BPS, ROOT_PORTS, ROOT_SWITCHING_DELAY_SECS,
};
