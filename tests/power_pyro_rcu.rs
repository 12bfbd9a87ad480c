mod common;

use common::*;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use rcu_firmware::common::can_bus::messages::{
    HealthState, HeartbeatMessage, PowerControlMessage, PowerStatusMessage, PyroControlMessage,
    PyroStatusMessage,
};
use rcu_firmware::rcu::power_pyro::PowerPyroSubsystem;
use rcu_firmware::rcu::shutdown_latch::ShutdownLatchState;
use rcu_firmware::{NodeState, RcuConfig, RcuId, RcuNode, RcuRole, RcuSharedState};

type MockPowerPyroSubsystem = PowerPyroSubsystem<MockPowerSubsystem, MockPyroSubsystem>;

struct PowerPyroBench {
    clock: MockClock,
    can_tx: MockCanTx,
    power: PowerRig,
    pyro: PyroRig,
}

impl PowerPyroBench {
    fn new() -> Self {
        init_logger();
        Self {
            clock: MockClock::new(0),
            can_tx: MockCanTx::default(),
            power: PowerRig::new(),
            pyro: PyroRig::default(),
        }
    }

    fn node<'a>(
        &self,
        shared: &'a RcuSharedState<NoopRawMutex>,
    ) -> MockNode<'a, MockPowerPyroSubsystem> {
        let config = RcuConfig::new();
        RcuNode::new(
            config,
            shared,
            self.clock.clone(),
            self.can_tx.clone(),
            MockOutput::default(),
            PowerPyroSubsystem::new(self.power.subsystem(&config), self.pyro.subsystem()),
        )
        .unwrap()
    }
}

fn heartbeat() -> HeartbeatMessage {
    HeartbeatMessage {
        health: HealthState::Nominal,
        uptime_s: 0,
    }
}

#[futures_test::test]
async fn sends_both_status_messages_under_one_id() {
    let bench = PowerPyroBench::new();
    let shared = RcuSharedState::<NoopRawMutex>::new();
    let mut node = bench.node(&shared);
    assert_eq!(node.role(), RcuRole::PowerPyroRcu);

    run_until(&mut node, &bench.clock, 500).await;
    assert_eq!(
        bench.can_tx.messages::<PowerStatusMessage>(RcuId::PowerPyro).len(),
        5
    );
    assert_eq!(
        bench.can_tx.messages::<PyroStatusMessage>(RcuId::PowerPyro).len(),
        5
    );
    assert_eq!(
        bench.can_tx.messages::<HeartbeatMessage>(RcuId::PowerPyro).len(),
        1
    );
    assert!(bench.can_tx.last::<PowerStatusMessage>(RcuId::Power).is_none());
    assert!(bench.can_tx.last::<PyroStatusMessage>(RcuId::Pyro).is_none());
}

#[futures_test::test]
async fn health_is_the_worst_of_both_sides() {
    let bench = PowerPyroBench::new();
    let shared = RcuSharedState::<NoopRawMutex>::new();
    let mut node = bench.node(&shared);

    bench.power.voltage_12v.set_fail(true);
    run_until(&mut node, &bench.clock, 500).await;
    let heartbeat = bench
        .can_tx
        .last::<HeartbeatMessage>(RcuId::PowerPyro)
        .unwrap();
    assert_eq!(heartbeat.health, HealthState::Degraded);

    bench.power.voltage_12v.set_fail(false);
    run_until(&mut node, &bench.clock, 1_000).await;
    let heartbeat = bench
        .can_tx
        .last::<HeartbeatMessage>(RcuId::PowerPyro)
        .unwrap();
    assert_eq!(heartbeat.health, HealthState::Nominal);
}

#[futures_test::test]
async fn committed_shutdown_also_disarms_pyro() {
    let bench = PowerPyroBench::new();
    let shared = RcuSharedState::<NoopRawMutex>::new();
    let mut node = bench.node(&shared);
    let dispatcher = node.dispatcher();

    dispatcher
        .dispatch(&shared, &frame_from(RcuId::Main, &heartbeat()))
        .unwrap();
    dispatcher
        .dispatch(
            &shared,
            &frame_from(
                RcuId::Main,
                &PyroControlMessage {
                    fire_igniter: false,
                    fire_drogue: false,
                    fire_main: true,
                },
            ),
        )
        .unwrap();
    dispatcher
        .dispatch(
            &shared,
            &frame_from(
                RcuId::Main,
                &PowerControlMessage {
                    shutdown_request: true,
                },
            ),
        )
        .unwrap();
    node.step().await;
    assert_eq!(bench.pyro.fire_levels(), [false, false, true]);

    // keep the link alive so only the shutdown can turn the pyro off
    for until in (500..=20_000).step_by(500) {
        let state = run_until(&mut node, &bench.clock, until).await;
        assert_eq!(state, NodeState::Running);
        dispatcher
            .dispatch(&shared, &frame_from(RcuId::Main, &heartbeat()))
            .unwrap();
    }

    let state = run_until(&mut node, &bench.clock, 20_099).await;
    assert_eq!(state, NodeState::Running);
    assert_eq!(bench.pyro.fire_levels(), [false, false, true]);
    assert!(bench.power.power_switch.level());

    let state = run_until(&mut node, &bench.clock, 20_100).await;
    assert_eq!(state, NodeState::Halted);
    assert_eq!(
        node.subsystem().power.latch_state(),
        ShutdownLatchState::Committed
    );
    assert!(!bench.power.power_switch.level());
    assert_eq!(bench.pyro.fire_levels(), [false, false, false]);
}
