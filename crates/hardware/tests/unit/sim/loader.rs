//! # Loader Tests
//!
//! Covers `KEY: VALUE` parsing, kind hints, per-child failure isolation, registration order,
//! nested platforms and filesystem resolution.

use std::fs;

use plasim_core::LoadError;
use plasim_core::sim::loader::{kind_from_hint, kind_hint};
use plasim_core::sim::{
    ConfigProvider, ConfigSource, FsProvider, KeyValueSource, MAX_PLATFORM_DEPTH, MemoryProvider,
};
use plasim_core::soc::{Component, ComponentKind};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::harness::{TestContext, pipeline_provider};

#[test]
fn test_key_value_source_trims_and_skips() {
    let text = "TYPE : BUS\n\nno colon here\nLABEL:   b0  \nEMPTY:\nURL: http://x\n";
    let mut source = KeyValueSource::parse("bus.txt", text);
    assert_eq!(source.origin(), "bus.txt");
    assert_eq!(source.remaining(), 3);

    let entries: Vec<_> = std::iter::from_fn(|| source.next_entry())
        .map(|e| (e.key, e.value, e.line))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("TYPE".to_owned(), "BUS".to_owned(), 1),
            ("LABEL".to_owned(), "b0".to_owned(), 4),
            ("URL".to_owned(), "http://x".to_owned(), 6),
        ]
    );
}

#[rstest]
#[case("configs/cpu0.txt", "cpu0.txt", Some(ComponentKind::Cpu))]
#[case("configs/memory.txt", "memory.txt", Some(ComponentKind::Memory))]
#[case("x/mem", "mem", Some(ComponentKind::Memory))]
#[case("configs/bus1.txt", "bus1.txt", Some(ComponentKind::Bus))]
#[case("configs/display.txt", "display.txt", Some(ComponentKind::Display))]
#[case("configs/platform.txt", "platform.txt", Some(ComponentKind::Platform))]
#[case("cpu_bus", "cpu_bus", Some(ComponentKind::Cpu))]
#[case("a/b/bus.txt", "b/bus.txt", Some(ComponentKind::Bus))]
#[case("configs/gpu.txt", "gpu.txt", None)]
#[case("configs/CPU.txt", "CPU.txt", None)]
fn test_kind_hint(
    #[case] value: &str,
    #[case] hint: &str,
    #[case] kind: Option<ComponentKind>,
) {
    assert_eq!(kind_hint(value), hint);
    assert_eq!(kind_from_hint(kind_hint(value)), kind);
}

#[test]
fn test_load_pipeline_platform() {
    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&pipeline_provider(), "platform.txt").unwrap();

    let platform = tc.platform(root);
    assert_eq!(platform.cpus().len(), 1);
    assert_eq!(platform.buses().len(), 1);
    assert_eq!(platform.memories().len(), 1);
    assert_eq!(platform.displays().len(), 1);
    assert_eq!(platform.registered().len(), 3);

    let labels: Vec<_> = tc
        .sim
        .registry()
        .entries()
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(labels, vec!["cpu0", "bus0", "mem0"]);

    let bus = tc.resolve("bus0");
    assert_eq!(tc.bus(bus).source(), Some(tc.resolve("cpu0")));
    assert_eq!(tc.bus(bus).width(), 4);
    let display = platform.displays()[0];
    assert_eq!(tc.display(display).source(), Some(tc.resolve("mem0")));
}

#[test]
fn test_pipeline_platform_runs() {
    let mut tc = TestContext::new();
    let _ = tc.sim.load_platform(&pipeline_provider(), "platform.txt").unwrap();
    tc.run(4);

    // The CPU computes [3, 6] in cycles 1 and 3 and wraps in 2 and 4. The bus exposes each batch
    // one cycle later, the memory stores it the cycle after that, and the display drains it at
    // once. Only the cycle 1 batch reaches the display within four cycles.
    assert_eq!(tc.frames.len(), 4);
    assert_eq!(tc.frames.values(), vec![3.0, 6.0]);
    assert_eq!(tc.sim.stats().instructions_executed, 4);
}

#[test]
fn test_failing_child_is_skipped() {
    let provider = MemoryProvider::new()
        .with_file(
            "p.txt",
            "TYPE: PLATFORM\nCOMPONENT: p/bad_bus.txt\nCOMPONENT: p/missing_mem.txt\n\
             COMPONENT: p/weird.gpu\nCOMPONENT: p/good_bus.txt\n",
        )
        .with_file("p/bad_bus.txt", "TYPE: MEMORY\nLABEL: bad\n")
        .with_file("p/good_bus.txt", "TYPE: BUS\nLABEL: good\n");

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "p.txt").unwrap();
    assert_eq!(tc.platform(root).buses().len(), 1);
    assert!(tc.platform(root).memories().is_empty());
    assert_eq!(tc.sim.registry().len(), 1);
    assert!(tc.sim.resolve("good").is_some());
    assert!(tc.sim.resolve("bad").is_none());
}

#[rstest]
#[case("TYPE: BUS\n", "PLATFORM")]
#[case("TYPE: platform\n", "PLATFORM")]
fn test_top_level_type_mismatch(#[case] text: &str, #[case] expected_kind: &str) {
    let provider = MemoryProvider::new().with_file("p.txt", text);
    let mut tc = TestContext::new();
    let err = tc.sim.load_platform(&provider, "p.txt").unwrap_err();
    assert!(matches!(err, LoadError::TypeMismatch { expected, .. } if expected == expected_kind));
    assert!(tc.sim.roots().is_empty());
}

#[test]
fn test_missing_top_level_file() {
    let mut tc = TestContext::new();
    let err = tc.sim.load_platform(&MemoryProvider::new(), "nope.txt").unwrap_err();
    assert!(matches!(err, LoadError::MissingFile { ref path } if path == "nope.txt"));
}

#[test]
fn test_invalid_number_fails_child() {
    let provider = MemoryProvider::new()
        .with_file("p.txt", "TYPE: PLATFORM\nCOMPONENT: p/bus.txt\n")
        .with_file("p/bus.txt", "TYPE: BUS\nWIDTH: two\n");
    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "p.txt").unwrap();
    assert!(tc.platform(root).buses().is_empty());
}

#[test]
fn test_oversized_memory_fails_child() {
    let provider = MemoryProvider::new()
        .with_file("p.txt", "TYPE: PLATFORM\nCOMPONENT: p/mem.txt\nCOMPONENT: p/bus.txt\n")
        .with_file("p/mem.txt", "TYPE: MEMORY\nLABEL: huge\nSIZE: 18446744073709551615\n")
        .with_file("p/bus.txt", "TYPE: BUS\nLABEL: b\n");
    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "p.txt").unwrap();
    assert!(tc.platform(root).memories().is_empty());
    assert!(tc.sim.resolve("huge").is_none());
    assert_eq!(tc.platform(root).buses().len(), 1);
}

#[test]
fn test_unreadable_program_fails_cpu() {
    let provider = MemoryProvider::new()
        .with_file("p.txt", "TYPE: PLATFORM\nCOMPONENT: p/cpu.txt\n")
        .with_file("p/cpu.txt", "TYPE: CPU\nLABEL: c\nPROGRAM: absent.prog\n");
    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "p.txt").unwrap();
    assert!(tc.platform(root).cpus().is_empty());
    assert!(tc.sim.resolve("c").is_none());
}

#[test]
fn test_later_sibling_binds_to_earlier_one() {
    let provider = MemoryProvider::new()
        .with_file(
            "p.txt",
            "TYPE: PLATFORM\nCOMPONENT: p/bus2.txt\nCOMPONENT: p/bus1.txt\nCOMPONENT: p/bus3.txt\n",
        )
        .with_file("p/bus1.txt", "TYPE: BUS\nLABEL: first\n")
        .with_file("p/bus2.txt", "TYPE: BUS\nLABEL: early\nSOURCE: first\n")
        .with_file("p/bus3.txt", "TYPE: BUS\nLABEL: late\nSOURCE: first\n");
    let mut tc = TestContext::new();
    let _ = tc.sim.load_platform(&provider, "p.txt").unwrap();

    assert_eq!(tc.bus(tc.resolve("early")).source(), None);
    assert_eq!(tc.bus(tc.resolve("late")).source(), Some(tc.resolve("first")));
}

#[test]
fn test_nested_platform_shares_run_registry() {
    let provider = MemoryProvider::new()
        .with_file(
            "outer.txt",
            "TYPE: PLATFORM\nLABEL: outer\nCOMPONENT: outer/inner_platform.txt\n\
             COMPONENT: outer/mem.txt\n",
        )
        .with_file(
            "outer/inner_platform.txt",
            "TYPE: PLATFORM\nLABEL: inner\nCOMPONENT: inner/cpu.txt\n",
        )
        .with_file("inner/cpu.txt", "TYPE: CPU\nLABEL: deep\n")
        .with_file("outer/mem.txt", "TYPE: MEMORY\nLABEL: m\nSOURCE: deep\n");

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "outer.txt").unwrap();

    assert!(tc.sim.resolve("inner").is_none());
    let inner = tc.platform(root).platforms()[0];
    assert_eq!(tc.platform(inner).registered(), &[tc.resolve("deep")]);
    assert_eq!(tc.platform(root).registered(), &[tc.resolve("m")]);
    assert_eq!(tc.memory(tc.resolve("m")).source(), Some(tc.resolve("deep")));
}

#[test]
fn test_self_including_platform_skips_the_cycle() {
    let provider = MemoryProvider::new()
        .with_file(
            "p/platform.txt",
            "TYPE: PLATFORM\nLABEL: loop\nCOMPONENT: p/platform.txt\nCOMPONENT: p/bus.txt\n",
        )
        .with_file("p/bus.txt", "TYPE: BUS\nLABEL: b\n");

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "p/platform.txt").unwrap();
    assert!(tc.platform(root).platforms().is_empty());
    assert_eq!(tc.platform(root).buses(), &[tc.resolve("b")]);
    tc.run(2);
    assert_eq!(tc.sim.stats().cycles, 2);
}

#[test]
fn test_indirect_include_cycle_is_cut_at_the_repeat() {
    let provider = MemoryProvider::new()
        .with_file("a/platform.txt", "TYPE: PLATFORM\nLABEL: a\nCOMPONENT: b/platform.txt\n")
        .with_file(
            "b/platform.txt",
            "TYPE: PLATFORM\nLABEL: b\nCOMPONENT: a/platform.txt\nCOMPONENT: b/mem.txt\n",
        )
        .with_file("b/mem.txt", "TYPE: MEMORY\nLABEL: m\n");

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "a/platform.txt").unwrap();
    let inner = tc.platform(root).platforms()[0];
    assert_eq!(tc.platform(inner).label(), "b");
    assert!(tc.platform(inner).platforms().is_empty());
    assert_eq!(tc.platform(inner).memories(), &[tc.resolve("m")]);
}

#[test]
fn test_same_platform_may_be_included_twice_side_by_side() {
    let provider = MemoryProvider::new()
        .with_file(
            "top.txt",
            "TYPE: PLATFORM\nCOMPONENT: top/platform.txt\nCOMPONENT: top/platform.txt\n",
        )
        .with_file("top/platform.txt", "TYPE: PLATFORM\nLABEL: twin\n");

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "top.txt").unwrap();
    assert_eq!(tc.platform(root).platforms().len(), 2);
}

#[test]
fn test_nesting_depth_is_limited() {
    let mut provider = MemoryProvider::new();
    for level in 0..MAX_PLATFORM_DEPTH + 4 {
        let next = level + 1;
        let text = format!("TYPE: PLATFORM\nLABEL: l{level}\nCOMPONENT: d{next}/platform.txt\n");
        provider.insert(&format!("d{level}/platform.txt"), &text);
    }

    let mut tc = TestContext::new();
    let root = tc.sim.load_platform(&provider, "d0/platform.txt").unwrap();
    let mut platform = root;
    let mut levels = 1;
    while let Some(&next) = tc.platform(platform).platforms().first() {
        platform = next;
        levels += 1;
    }
    assert_eq!(levels, MAX_PLATFORM_DEPTH);
}

#[test]
fn test_fs_provider_resolves_relative_to_base_dir() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("parts")).unwrap();
    fs::write(
        dir.path().join("platform.txt"),
        "TYPE: PLATFORM\nCOMPONENT: parts/cpu.txt\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("parts/cpu.txt"),
        "TYPE: CPU\nLABEL: cpu0\nPROGRAM: parts/prog.txt\n",
    )
    .unwrap();
    fs::write(dir.path().join("parts/prog.txt"), "ADD 5 3\n").unwrap();

    let config = dir.path().join("platform.txt");
    let config = config.to_str().unwrap();
    let provider = FsProvider::for_config(config);

    let mut tc = TestContext::new();
    let _ = tc.sim.load_platform(&provider, config).unwrap();
    let cpu = tc.resolve("cpu0");
    assert_eq!(tc.cpu(cpu).program().len(), 1);

    tc.run(1);
    assert_eq!(tc.drain(cpu), vec![8.0]);
}

#[test]
fn test_fs_provider_reports_io_error() {
    let dir = TempDir::new().unwrap();
    let provider = FsProvider::with_base_dir(dir.path());
    let err = provider.read_text("absent.txt").unwrap_err();
    assert!(matches!(err, LoadError::Io { ref path, .. } if path == "absent.txt"));
}
