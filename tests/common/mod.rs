#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use log::LevelFilter;
use packed_struct::types::bits::ByteArray;
use rcu_firmware::common::can_bus::id::{CanBusStandardId, RcuId};
use rcu_firmware::common::can_bus::message::CanBusMessage;
use rcu_firmware::driver::adc::{UnitType, ADC};
use rcu_firmware::driver::can_bus::{CanBusRX, CanBusTX, CanFrame};
use rcu_firmware::driver::clock::Clock;
use rcu_firmware::driver::indicator::Indicator;
use rcu_firmware::driver::power::{ExternalPowerSense, PowerSwitch};
use rcu_firmware::driver::pyro::{Continuity, PyroCtrl};
use rcu_firmware::rcu::capability::RcuCapability;
use rcu_firmware::rcu::power::PowerSubsystem;
use rcu_firmware::rcu::pyro::{PyroChannel, PyroSubsystem};
use rcu_firmware::{NodeState, RcuConfig, RcuNode, WrappingMillis};

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Error)
        .filter(Some("rcu_firmware"), LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

#[derive(Debug)]
pub struct MockError;

/// Millisecond clock under test control. `auto_advance_ms` moves time forward
/// on every read of the millisecond counter.
#[derive(Clone)]
pub struct MockClock {
    time_ms: Rc<Cell<u32>>,
    auto_advance_ms: u32,
}

impl MockClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            time_ms: Rc::new(Cell::new(start_ms)),
            auto_advance_ms: 0,
        }
    }

    pub fn auto_advancing(start_ms: u32, auto_advance_ms: u32) -> Self {
        Self {
            time_ms: Rc::new(Cell::new(start_ms)),
            auto_advance_ms,
        }
    }

    pub fn now(&self) -> u32 {
        self.time_ms.get()
    }

    pub fn set(&self, time_ms: u32) {
        self.time_ms.set(time_ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> WrappingMillis {
        let now = self.time_ms.get();
        self.time_ms.set(now + self.auto_advance_ms);
        WrappingMillis(now as u16)
    }

    fn uptime_s(&self) -> u32 {
        self.time_ms.get() / 1000
    }
}

/// Digital output that remembers its level.
#[derive(Clone, Default)]
pub struct MockOutput {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
    fail: Rc<Cell<bool>>,
}

impl MockOutput {
    pub fn level(&self) -> bool {
        self.level.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn write(&self, level: bool) -> Result<(), MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        self.level.set(level);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl PyroCtrl for MockOutput {
    type Error = MockError;

    async fn set_enable(&mut self, enable: bool) -> Result<(), MockError> {
        self.write(enable)
    }
}

impl PowerSwitch for MockOutput {
    type Error = MockError;

    async fn set_enable(&mut self, enable: bool) -> Result<(), MockError> {
        self.write(enable)
    }
}

impl Indicator for MockOutput {
    async fn set_enable(&mut self, enable: bool) {
        let _ = self.write(enable);
    }
}

#[derive(Clone, Default)]
pub struct MockInput {
    level: Rc<Cell<bool>>,
    fail: Rc<Cell<bool>>,
}

impl MockInput {
    pub fn set(&self, level: bool) {
        self.level.set(level);
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn read(&self) -> Result<bool, MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        Ok(self.level.get())
    }
}

impl Continuity for MockInput {
    type Error = MockError;

    async fn read_continuity(&mut self) -> Result<bool, MockError> {
        self.read()
    }
}

impl ExternalPowerSense for MockInput {
    type Error = MockError;

    async fn read_connected(&mut self) -> Result<bool, MockError> {
        self.read()
    }
}

#[derive(Clone, Default)]
pub struct MockAdc {
    value: Rc<Cell<u16>>,
    fail: Rc<Cell<bool>>,
}

impl MockAdc {
    pub fn set(&self, value: u16) {
        self.value.set(value);
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl<U: UnitType> ADC<U> for MockAdc {
    type Error = MockError;

    async fn read(&mut self) -> Result<u16, MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        Ok(self.value.get())
    }
}

/// Records every frame pushed onto the transmit queue.
#[derive(Clone, Default)]
pub struct MockCanTx {
    sent: Rc<RefCell<Vec<CanFrame>>>,
}

impl MockCanTx {
    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn messages<M: CanBusMessage>(&self, sender: RcuId) -> Vec<M> {
        let id: u32 = M::create_id(sender).into();
        self.sent
            .borrow()
            .iter()
            .filter(|frame| frame.id == id)
            .map(|frame| M::from_data(&frame.data).unwrap())
            .collect()
    }

    pub fn last<M: CanBusMessage>(&self, sender: RcuId) -> Option<M> {
        self.messages::<M>(sender).pop()
    }
}

impl CanBusTX for MockCanTx {
    type Error = MockError;

    async fn send_data(&mut self, id: u32, data: &[u8]) -> Result<(), MockError> {
        let frame = CanFrame::new(id, data).ok_or(MockError)?;
        self.sent.borrow_mut().push(frame);
        Ok(())
    }
}

/// Hands out queued frames, then waits forever.
#[derive(Clone, Default)]
pub struct MockCanRx {
    queue: Rc<RefCell<VecDeque<Result<CanFrame, MockError>>>>,
}

impl MockCanRx {
    pub fn push(&self, frame: CanFrame) {
        self.queue.borrow_mut().push_back(Ok(frame));
    }

    pub fn push_error(&self) {
        self.queue.borrow_mut().push_back(Err(MockError));
    }
}

impl CanBusRX for MockCanRx {
    type Error = MockError;
    type Message = CanFrame;

    async fn receive(&mut self) -> Result<CanFrame, MockError> {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(result) => result,
            None => core::future::pending().await,
        }
    }
}

pub fn frame_from<M: CanBusMessage>(sender: RcuId, message: &M) -> CanFrame {
    let data = message.to_data().unwrap();
    CanFrame::new(M::create_id(sender).into(), data.as_bytes_slice()).unwrap()
}

pub fn raw_frame(message_type: u8, sender: RcuId, data: &[u8]) -> CanFrame {
    CanFrame::new(CanBusStandardId::new(message_type, sender).into(), data).unwrap()
}

pub type MockPowerSubsystem =
    PowerSubsystem<MockOutput, MockInput, MockAdc, MockAdc, MockAdc, MockOutput>;

pub type MockPyroSubsystem =
    PyroSubsystem<MockInput, MockOutput, MockInput, MockOutput, MockInput, MockOutput, MockAdc>;

pub type MockNode<'a, R> = RcuNode<'a, NoopRawMutex, MockClock, MockCanTx, MockOutput, R>;

#[derive(Clone, Default)]
pub struct PowerRig {
    pub power_switch: MockOutput,
    pub external_power: MockInput,
    pub voltage_12v: MockAdc,
    pub current_12v: MockAdc,
    pub current_5v: MockAdc,
    pub power_indicator: MockOutput,
}

impl PowerRig {
    pub fn new() -> Self {
        let rig = Self::default();
        rig.voltage_12v.set(12_000);
        rig.current_12v.set(2_000);
        rig.current_5v.set(500);
        rig
    }

    pub fn subsystem(&self, config: &RcuConfig) -> MockPowerSubsystem {
        PowerSubsystem::new(
            config,
            self.power_switch.clone(),
            self.external_power.clone(),
            self.voltage_12v.clone(),
            self.current_12v.clone(),
            self.current_5v.clone(),
            self.power_indicator.clone(),
        )
    }
}

#[derive(Clone, Default)]
pub struct PyroRig {
    pub igniter_continuity: MockInput,
    pub igniter_fire: MockOutput,
    pub drogue_continuity: MockInput,
    pub drogue_fire: MockOutput,
    pub main_continuity: MockInput,
    pub main_fire: MockOutput,
    pub battery: MockAdc,
}

impl PyroRig {
    pub fn fire_levels(&self) -> [bool; 3] {
        [
            self.igniter_fire.level(),
            self.drogue_fire.level(),
            self.main_fire.level(),
        ]
    }

    pub fn subsystem(&self) -> MockPyroSubsystem {
        PyroSubsystem::new(
            PyroChannel::new(
                "igniter",
                self.igniter_continuity.clone(),
                self.igniter_fire.clone(),
            ),
            PyroChannel::new(
                "drogue",
                self.drogue_continuity.clone(),
                self.drogue_fire.clone(),
            ),
            PyroChannel::new("main", self.main_continuity.clone(), self.main_fire.clone()),
            self.battery.clone(),
        )
    }
}

/// Steps the node once per millisecond up to and including `end_ms`.
pub async fn run_until<R: RcuCapability>(
    node: &mut MockNode<'_, R>,
    clock: &MockClock,
    end_ms: u32,
) -> NodeState {
    let mut state = node.state();
    while clock.now() < end_ms {
        clock.set(clock.now() + 1);
        state = node.step().await;
    }
    state
}

/// Returns immediately, recording how long it was asked to wait.
#[derive(Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns.get() / 1_000_000
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
    }
}
