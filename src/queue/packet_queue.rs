//! 单目的地 FIFO 队列
//!
//! 入队保持到达顺序，整批排空后队列归零。不设深度上限，
//! 背压属于外层调度器的策略。

use std::collections::VecDeque;

use crate::net::NetworkPacket;

#[derive(Debug, Default)]
pub struct PacketQueue {
    q: VecDeque<NetworkPacket>,
    cur_bytes: u64,
}

impl PacketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队：追加到尾部，保持 FIFO 到达顺序。
    pub fn enqueue(&mut self, pkt: NetworkPacket) {
        self.cur_bytes = self.cur_bytes.saturating_add(pkt.size_bytes);
        self.q.push_back(pkt);
    }

    /// 整批取走当前排队的全部 packet 并清空队列。
    /// 排空后再次调用返回空序列，直到有新的入队。
    pub fn drain_all(&mut self) -> Vec<NetworkPacket> {
        self.cur_bytes = 0;
        self.q.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn bytes(&self) -> u64 {
        self.cur_bytes
    }
}
