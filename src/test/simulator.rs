use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

struct Push {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
    }
}

struct PushThenScheduleNow {
    id: u32,
    next_id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for PushThenScheduleNow {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let PushThenScheduleNow { id, next_id, log } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(sim.now(), Push { id: next_id, log });
    }
}

#[test]
fn events_run_in_time_order_then_submission_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), Push { id: 1, log: Arc::clone(&log) });
    sim.schedule(SimTime(5), Push { id: 2, log: Arc::clone(&log) });
    sim.schedule(SimTime(10), Push { id: 3, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(*log.lock().expect("log lock"), vec![2, 1, 3]);
    assert_eq!(sim.now(), SimTime(10));
    assert_eq!(world.ticks, 3);
}

#[test]
fn same_time_self_scheduled_event_runs_after_already_queued_events() {
    // 两个事件同在 T=1：第一个执行时又在 T=1 调度新事件，
    // 新事件的序号更大，必须排在已入队的第二个事件之后。
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(1),
        PushThenScheduleNow {
            id: 1,
            next_id: 3,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(SimTime(1), Push { id: 2, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(*log.lock().expect("log lock"), vec![1, 2, 3]);
}

#[test]
fn run_until_stops_before_later_events_and_advances_clock() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), Push { id: 1, log: Arc::clone(&log) });
    sim.schedule(SimTime(50), Push { id: 2, log: Arc::clone(&log) });

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(10), &mut world);

    assert_eq!(*log.lock().expect("log lock"), vec![1]);
    assert_eq!(sim.now(), SimTime(10));
}
