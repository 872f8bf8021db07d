use crate::net::{batch_delay, HostId, NetworkPacket, VmId};
use crate::sim::SimTime;

fn pkt(id: u64, size_bytes: u64) -> NetworkPacket {
    NetworkPacket {
        id,
        sender_vm: VmId(0),
        receiver_vm: VmId(1),
        sender_host: HostId(0),
        receiver_host: None,
        size_bytes,
        created_at: SimTime::ZERO,
    }
}

#[test]
fn empty_batch_has_no_delay() {
    assert!(batch_delay(&[], 1_000_000, SimTime(100)).is_none());
}

#[test]
fn batch_is_billed_as_a_whole() {
    // 100MB/s 下行、交换时延 0.00157s、两个 50MB packet 同批：
    // 时延 = 0.00157 + (50+50)/100 = 1.00157s，整批同价。
    let bandwidth_bps = 800_000_000; // 100 MB/s
    let switching = SimTime::from_secs_f64(0.00157);
    let batch = vec![pkt(1, 50_000_000), pkt(2, 50_000_000)];

    let delay = batch_delay(&batch, bandwidth_bps, switching).expect("non-empty batch");
    assert_eq!(delay, SimTime(1_001_570_000));
}

#[test]
fn delay_is_switching_delay_plus_size_over_bandwidth() {
    // 1000 字节 @ 8000 bit/s = 1s，加 1ms 交换时延。
    let delay = batch_delay(&[pkt(1, 1000)], 8_000, SimTime::from_millis(1)).expect("batch");
    assert_eq!(delay, SimTime(1_001_000_000));
}

#[test]
fn delay_is_non_decreasing_in_batch_size() {
    let bandwidth_bps = 8_000_000;
    let switching = SimTime::from_micros(5);

    let mut batch = Vec::new();
    let mut last = SimTime::ZERO;
    for id in 0..16 {
        batch.push(pkt(id, 1500));
        let delay = batch_delay(&batch, bandwidth_bps, switching).expect("batch");
        assert!(delay >= last, "delay shrank as the batch grew");
        last = delay;
    }
}

#[test]
fn zero_bandwidth_saturates_instead_of_dividing_by_zero() {
    let delay = batch_delay(&[pkt(1, 1500)], 0, SimTime::ZERO).expect("batch");
    assert!(delay >= SimTime(u64::MAX / 4));
}
