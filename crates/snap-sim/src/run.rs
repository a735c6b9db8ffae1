//! Replay a scenario through a transition controller.

use std::{mem, sync::Arc};

use parking_lot::Mutex;
use snap_geom::{Rect, Screen, ScreenProvider, WindowCoordinates, WindowTransition};
use snap_motion::{ControllerCfg, Outcome, TransitionController, TransitionObserver, VirtualWindow};
use tokio::runtime::Builder;
use tracing::info;

use crate::{cli::Cli, error::Result, scenario::Scenario};

/// Collects a line-oriented report of controller progress.
struct Report {
    window: VirtualWindow,
    frames: bool,
    seen: Mutex<usize>,
    lines: Mutex<Vec<String>>,
}

impl Report {
    fn new(window: VirtualWindow, frames: bool) -> Self {
        Self {
            window,
            frames,
            seen: Mutex::new(0),
            lines: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, line: String) {
        self.lines.lock().push(line);
    }

    fn take(&self) -> Vec<String> {
        mem::take(&mut *self.lines.lock())
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Skipped => "skipped".to_string(),
        Outcome::Converged { attempts: 0 } => "converged".to_string(),
        Outcome::Converged { attempts } => format!("converged after {attempts} retries"),
        Outcome::Abandoned { last: Some(r) } => format!("abandoned at {r}"),
        Outcome::Abandoned { last: None } => "abandoned".to_string(),
        Outcome::Superseded { by } => format!("superseded by #{by}"),
        Outcome::Cancelled => "cancelled".to_string(),
    }
}

impl TransitionObserver for Report {
    fn on_resolved(
        &self,
        seq: u64,
        transition: &WindowTransition,
        from: Rect,
        target: Option<Rect>,
    ) {
        let target = target.map_or_else(|| "no change".to_string(), |t| t.to_string());
        self.push(format!("#{seq} {}: {from} -> {target}", transition.kind()));
    }

    fn on_settled(&self, seq: u64, outcome: &Outcome) {
        if self.frames {
            let history = self.window.history();
            let mut seen = self.seen.lock();
            for frame in history.iter().skip(*seen) {
                self.push(format!("    frame {frame}"));
            }
            *seen = history.len();
        }
        self.push(format!("#{seq} {}", describe(outcome)));
    }
}

/// Submit every transition of `scenario` and wait for the controller to drain.
///
/// Returns the report lines, ending with the final frame and its coordinates.
pub async fn simulate(scenario: &Scenario, cfg: ControllerCfg, frames: bool) -> Vec<String> {
    let desktop = scenario.desktop();
    let window = scenario.virtual_window();
    let report = Arc::new(Report::new(window.clone(), frames));
    let controller = TransitionController::new(Arc::new(window.clone()), desktop.clone(), cfg)
        .with_observer(report.clone());

    for transition in &scenario.transitions {
        controller.submit(transition.clone());
    }
    controller.wait_idle().await;
    controller.shutdown();

    let mut lines = report.take();
    let frame = window.current();
    match desktop.screen_containing(&frame) {
        Some(screen) => {
            let coords = WindowCoordinates::from_window_frame(&frame, &screen, &*desktop);
            lines.push(format!("final {frame} on {} {coords}", screen.name()));
        }
        None => lines.push(format!("final {frame}")),
    }
    lines
}

/// Run the CLI: load inputs, replay and print the report.
pub fn run(cli: &Cli) -> Result<()> {
    let scenario = Scenario::load(&cli.scenario)?;
    let cfg = match &cli.config {
        Some(path) => ControllerCfg::load(path)?,
        None => ControllerCfg::default(),
    };
    info!(
        scenario = %cli.scenario.display(),
        transitions = scenario.transitions.len(),
        realtime = cli.realtime,
        "simulation_start"
    );
    let runtime = Builder::new_current_thread()
        .enable_all()
        .start_paused(!cli.realtime)
        .build()?;
    for line in runtime.block_on(simulate(&scenario, cfg, cli.frames)) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use snap_motion::AnimationPolicy;

    use super::*;

    const SCENARIO: &str = r#"{
        "screens": [{"id": 1, "name": "Main", "frame": {"x":0,"y":0,"w":1000,"h":1000}}],
        "window": {"frame": {"x":0,"y":0,"w":500,"h":500}},
        "transitions": [
            {"type": "moveRight", "breakpoints": ["x(50)"]},
            {"type": "moveRight", "breakpoints": ["x(50)"]}
        ]
    }"#;

    fn instant() -> ControllerCfg {
        ControllerCfg {
            animation: AnimationPolicy::Disabled,
            ..ControllerCfg::default()
        }
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn reports_each_transition() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let lines = simulate(&scenario, instant(), false).await;
        assert_eq!(
            lines,
            vec![
                "#1 moveRight: (0.0,0.0,500.0,500.0) -> (500.0,0.0,500.0,500.0)",
                "#1 converged",
                "#2 moveRight: (500.0,0.0,500.0,500.0) -> no change",
                "#2 skipped",
                "final (500.0,0.0,500.0,500.0) on Main [x 50 y 0 w 50 h 50]",
            ]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn frames_are_listed_before_the_outcome() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let lines = simulate(&scenario, instant(), true).await;
        assert_eq!(lines[1], "    frame (0.0,0.0,500.0,500.0)");
        assert_eq!(lines[2], "    frame (500.0,0.0,500.0,500.0)");
        assert_eq!(lines[3], "#1 converged");
    }

    #[test]
    fn outcome_descriptions() {
        assert_eq!(describe(&Outcome::Converged { attempts: 2 }), "converged after 2 retries");
        assert_eq!(describe(&Outcome::Abandoned { last: None }), "abandoned");
        assert_eq!(describe(&Outcome::Superseded { by: 3 }), "superseded by #3");
        assert_eq!(describe(&Outcome::Cancelled), "cancelled");
    }
}
