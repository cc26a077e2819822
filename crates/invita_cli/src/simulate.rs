//! Headless scene simulation
//!
//! Drives a [`SceneController`] with a gesture script on a fixed frame clock,
//! the way a frame loop would, and records every committed state.

use invita_animation::{AnimationScheduler, Property};
use invita_scene::{Region, SceneConfig, SceneController, SceneState};
use tracing::info;

use crate::script::Gesture;

/// A committed state and the simulated time it was committed at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commit {
    pub at_ms: f32,
    pub state: SceneState,
}

pub struct Simulation {
    // Declared first so it unmounts while the scheduler is still alive
    controller: SceneController,
    scheduler: AnimationScheduler,
    frame_ms: f32,
    clock_ms: f32,
    commits: Vec<Commit>,
}

impl Simulation {
    pub fn new(config: SceneConfig, width: f32, height: f32, fps: u32) -> Self {
        let scheduler = AnimationScheduler::new();
        let mut controller = SceneController::new(scheduler.handle(), config);
        controller.resize(width, height);
        controller.mount();

        Self {
            controller,
            scheduler,
            frame_ms: 1000.0 / fps.max(1) as f32,
            clock_ms: 0.0,
            commits: Vec::new(),
        }
    }

    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn clock_ms(&self) -> f32 {
        self.clock_ms
    }

    /// Apply one gesture; returns whether the scene acted on it
    pub fn step(&mut self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::Advance => self.controller.advance(),
            Gesture::Intro => self.controller.play_intro(),
            Gesture::Scroll(progress) => self.controller.on_scroll_progress(progress),
            Gesture::Offset(offset) => self.controller.on_scroll_offset(offset),
            Gesture::Wait(ms) => {
                self.wait(ms);
                true
            }
        }
    }

    /// Run frames until `ms` of simulated time has passed
    pub fn wait(&mut self, ms: f32) {
        let mut remaining = ms;
        while remaining > 0.0 {
            let dt = self.frame_ms.min(remaining);
            remaining -= dt;
            self.scheduler.tick_by(dt);
            self.clock_ms += dt;
            if let Some(state) = self.controller.sync() {
                info!("{:>8.1}ms  committed {}", self.clock_ms, state);
                self.commits.push(Commit {
                    at_ms: self.clock_ms,
                    state,
                });
            }
        }
    }

    /// Log the current properties of every region
    pub fn report(&self) {
        let handle = self.scheduler.handle();
        let (Some(envelope), Some(card)) = (self.controller.envelope(), self.controller.card())
        else {
            return;
        };

        let rows = envelope
            .regions()
            .iter()
            .map(|(region, id)| (format!("envelope.{}", region.name()), id))
            .chain(
                card.regions()
                    .iter()
                    .map(|(region, id)| (format!("card.{}", region.name()), id)),
            );

        for (name, id) in rows {
            let Some(props) = handle.target(id) else {
                continue;
            };
            let values: Vec<String> = Property::ALL
                .iter()
                .filter(|p| props.get(**p) != p.default_value())
                .map(|p| format!("{}={:.2}", p, props.get(*p)))
                .collect();
            info!("  {:<22} {}", name, values.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::default_script;

    #[test]
    fn test_default_script_round_trips() {
        let mut sim = Simulation::new(SceneConfig::default(), 1280.0, 800.0, 60);
        for gesture in default_script() {
            sim.step(gesture);
        }

        let states: Vec<_> = sim.commits().iter().map(|c| c.state).collect();
        assert_eq!(
            states,
            vec![SceneState::Closed, SceneState::Extracted, SceneState::Closed]
        );
        assert_eq!(sim.controller().state(), SceneState::Closed);
        assert_eq!(sim.controller().timelines_started(), 3);
    }

    #[test]
    fn test_ignored_gestures_are_reported() {
        let mut sim = Simulation::new(SceneConfig::default(), 1280.0, 800.0, 60);

        assert!(!sim.step(Gesture::Scroll(0.5)));
        assert!(sim.step(Gesture::Advance));
        assert!(!sim.step(Gesture::Advance));
        assert!(sim.step(Gesture::Wait(100.0)));
        assert_eq!(sim.controller().timelines_started(), 1);
    }

    #[test]
    fn test_wait_advances_clock_exactly() {
        let mut sim = Simulation::new(SceneConfig::default(), 1280.0, 800.0, 30);
        sim.wait(100.0);
        assert!((sim.clock_ms() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_extract_commits_after_its_duration() {
        let mut sim = Simulation::new(SceneConfig::default(), 1280.0, 800.0, 60);
        sim.step(Gesture::Advance);
        sim.wait(2700.0);
        assert!(sim.commits().is_empty());

        sim.wait(300.0);
        assert_eq!(sim.commits().len(), 1);
        assert!(sim.commits()[0].at_ms > 2799.0);
    }
}
