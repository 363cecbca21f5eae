use std::{
    cell::RefCell,
    time::{Duration, Instant},
};

use prettytable::{row, Table};

#[derive(Debug)]
struct TimerInner {
    enabled: bool,
    checking: Duration,
    preparing: Duration,
    compiling: Duration,

    running: Option<TimedPhase>,
}

pub struct TimerHandle<'a> {
    timer: &'a RefCell<TimerInner>,
}

impl<'a> TimerHandle<'a> {
    fn new(timer: &'a RefCell<TimerInner>) -> Self {
        Self { timer }
    }
}

impl Drop for TimerHandle<'_> {
    fn drop(&mut self) {
        let mut inner = self.timer.borrow_mut();

        if let Some(running) = inner.running.take() {
            let (phase, elapsed) = running.finish();
            match phase {
                Phase::Checking => inner.checking += elapsed,
                Phase::Preparing => inner.preparing += elapsed,
                Phase::Compiling => inner.compiling += elapsed,
            }
        }
    }
}

/// Records how long each phase of a build took.
///
/// Phases don't nest; starting one while another is running replaces it.
#[derive(Debug)]
pub struct Timer {
    inner: RefCell<TimerInner>,
}

impl Timer {
    pub fn new(enabled: bool) -> Self {
        let inner = TimerInner {
            enabled,
            checking: Duration::ZERO,
            preparing: Duration::ZERO,
            compiling: Duration::ZERO,

            running: None,
        };

        Self {
            inner: RefCell::new(inner),
        }
    }

    pub fn print(&self) {
        eprintln!("{}", self.table());
    }

    fn table(&self) -> Table {
        let inner = self.inner.borrow();

        let mut total = Duration::ZERO;
        let mut table = Table::new();
        table.set_format(*prettytable::format::consts::FORMAT_CLEAN);

        let mut add = |name: &str, time: Duration| {
            total += time;
            table.add_row(row![name, format!("{time:?}")]);
        };

        add("check paths", inner.checking);
        add("prepare", inner.preparing);
        add("compile", inner.compiling);

        table.add_empty_row();
        table.add_row(row!["total", format!("{total:?}")]);
        table
    }

    pub fn start_check(&self) -> TimerHandle<'_> {
        self.start(Phase::Checking)
    }

    pub fn start_prepare(&self) -> TimerHandle<'_> {
        self.start(Phase::Preparing)
    }

    pub fn start_compile(&self) -> TimerHandle<'_> {
        self.start(Phase::Compiling)
    }

    fn start(&self, phase: Phase) -> TimerHandle<'_> {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.enabled {
                inner.running = Some(TimedPhase::new(phase));
            }
        }

        TimerHandle::new(&self.inner)
    }
}

#[derive(Debug)]
struct TimedPhase {
    phase: Phase,
    start: Instant,
}

impl TimedPhase {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            start: Instant::now(),
        }
    }

    fn finish(self) -> (Phase, Duration) {
        (self.phase, self.start.elapsed())
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Checking,
    Preparing,
    Compiling,
}

#[test]
fn disabled_timer_records_nothing() {
    let timer = Timer::new(false);
    {
        let _t = timer.start_compile();
        std::thread::sleep(Duration::from_millis(2));
    }

    assert_eq!(timer.inner.borrow().compiling, Duration::ZERO);
}

#[test]
fn enabled_timer_records_phase() {
    let timer = Timer::new(true);
    {
        let _t = timer.start_compile();
        std::thread::sleep(Duration::from_millis(2));
    }

    let inner = timer.inner.borrow();
    assert!(inner.compiling >= Duration::from_millis(2));
    assert_eq!(inner.checking, Duration::ZERO);
    assert!(inner.running.is_none());
    drop(inner);

    let table = timer.table().to_string();
    assert!(table.contains("compile"));
    assert!(table.contains("total"));
}
