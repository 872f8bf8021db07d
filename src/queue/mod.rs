//! 队列模块
//!
//! 交换机按目的地缓冲待转发的 packet。每个目的地一个 FIFO 队列，
//! 转发 tick 时整批取走（collect-and-clear），保证不会重复发送。

mod destination;
mod packet_queue;

pub use destination::DestinationQueues;
pub use packet_queue::PacketQueue;
