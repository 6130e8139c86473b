//! # Platform Tests
//!
//! Simulation order is a contract: CPUs, memories, buses, displays, nested platforms, then
//! external kinds.

use std::cell::RefCell;
use std::rc::Rc;

use plasim_core::core::{Cpu, Program};
use plasim_core::sim::SimContext;
use plasim_core::soc::{Component, ComponentKind, Memory, Platform, Simulatable};
use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, values};

type Log = Rc<RefCell<Vec<String>>>;

/// Component recording its label each time it is simulated.
#[derive(Debug)]
struct Tracer {
    label: String,
    log: Log,
}

impl Simulatable for Tracer {
    fn simulate(&mut self, _ctx: &mut SimContext<'_>) {
        self.log.borrow_mut().push(self.label.clone());
    }

    fn describe(&self) -> String {
        format!("TRACER {}", self.label)
    }
}

impl Component for Tracer {
    fn kind(&self) -> ComponentKind {
        ComponentKind::External
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_owned();
    }
}

fn tracer(tc: &mut TestContext, log: &Log, label: &str) -> plasim_core::Handle {
    tc.sim.insert(Box::new(Tracer {
        label: label.to_owned(),
        log: Rc::clone(log),
    }))
}

#[test]
fn test_simulation_order_by_kind() {
    let mut tc = TestContext::new();
    let log = Log::default();

    let mut nested = Platform::new("inner");
    nested.attach(ComponentKind::Cpu, tracer(&mut tc, &log, "inner-cpu"));
    let nested = tc.sim.insert(Box::new(nested));

    let mut platform = Platform::new("outer");
    platform.attach(ComponentKind::External, tracer(&mut tc, &log, "ext"));
    platform.attach(ComponentKind::Platform, nested);
    platform.attach(ComponentKind::Display, tracer(&mut tc, &log, "display"));
    platform.attach(ComponentKind::Bus, tracer(&mut tc, &log, "bus"));
    platform.attach(ComponentKind::Memory, tracer(&mut tc, &log, "mem"));
    platform.attach(ComponentKind::Cpu, tracer(&mut tc, &log, "cpu"));
    platform.attach(ComponentKind::Cpu, tracer(&mut tc, &log, "cpu2"));
    let _ = tc.add_root(Box::new(platform));

    tc.run(1);
    assert_eq!(
        *log.borrow(),
        vec!["cpu", "cpu2", "mem", "bus", "display", "inner-cpu", "ext"]
    );
}

#[test]
fn test_consumer_after_producer_sees_same_cycle_data() {
    let mut tc = TestContext::new();
    let program = Program::parse("ADD 1 2\n").unwrap();
    let cpu = tc.sim.insert(Box::new(Cpu::new("cpu0", 1, 1, program)));
    let _ = tc.sim.register(cpu);

    let mut memory = Memory::new("mem0", 4, 1);
    assert!(memory.bind_source("cpu0", tc.sim.registry()));
    let mem = tc.sim.insert(Box::new(memory));

    let mut platform = Platform::new("main");
    platform.attach(ComponentKind::Memory, mem);
    platform.attach(ComponentKind::Cpu, cpu);
    let _ = tc.add_root(Box::new(platform));

    tc.run(1);
    assert_eq!(values(tc.memory(mem)), vec![3.0]);
}

#[test]
fn test_removed_child_is_skipped() {
    let mut tc = TestContext::new();
    let log = Log::default();
    let gone = tracer(&mut tc, &log, "gone");
    let kept = tracer(&mut tc, &log, "kept");

    let mut platform = Platform::new("main");
    platform.attach(ComponentKind::External, gone);
    platform.attach(ComponentKind::External, kept);
    let _ = tc.add_root(Box::new(platform));

    let _ = tc.sim.remove(gone);
    tc.run(2);
    assert_eq!(*log.borrow(), vec!["kept", "kept"]);
}

#[test]
fn test_externals_are_listed_apart_and_run_last() {
    let mut tc = TestContext::new();
    let log = Log::default();
    let ext = tracer(&mut tc, &log, "ext");
    let cpu = tracer(&mut tc, &log, "cpu");

    let mut platform = Platform::new("main");
    platform.attach(ComponentKind::External, ext);
    platform.attach(ComponentKind::Cpu, cpu);
    assert_eq!(platform.externals(), &[ext]);
    assert_eq!(platform.cpus(), &[cpu]);
    assert_eq!(platform.children().collect::<Vec<_>>(), vec![cpu, ext]);

    assert!(platform.detach(ext));
    assert!(platform.externals().is_empty());
}

#[test]
fn test_detach() {
    let mut tc = TestContext::new();
    let log = Log::default();
    let a = tracer(&mut tc, &log, "a");
    let mut platform = Platform::new("main");
    platform.attach(ComponentKind::Bus, a);
    platform.record_registration(a);

    assert!(platform.detach(a));
    assert!(!platform.detach(a));
    assert!(platform.buses().is_empty());
    assert!(platform.registered().is_empty());
}

#[test]
fn test_describe_and_read() {
    let mut tc = TestContext::new();
    let log = Log::default();
    let mut platform = Platform::new("board");
    platform.attach(ComponentKind::Cpu, tracer(&mut tc, &log, "c"));
    platform.attach(ComponentKind::Memory, tracer(&mut tc, &log, "m1"));
    platform.attach(ComponentKind::Memory, tracer(&mut tc, &log, "m2"));

    assert_eq!(
        platform.describe(),
        "PLATFORM label=\"board\" CPUs=1 Memories=2 Buses=0 Displays=0 Subplatforms=0"
    );
    assert_eq!(platform.children().count(), 3);

    let handle = tc.add_root(Box::new(platform));
    assert!(!tc.sim.read(handle).is_valid());
}
