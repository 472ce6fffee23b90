use std::time::SystemTime;

use gym_coach::{launch::CoachRuntime, snapshot::Snapshot};
use log::info;

use crate::ui::render_ui;

pub struct Model {
    pub runtime: CoachRuntime,
    /// Goal text fields, applied with the "Set goals" button
    pub rep_goal_input: String,
    pub set_goal_input: String,
    pub quit_requested: bool,
}

impl Model {
    pub fn new(runtime: CoachRuntime) -> Self {
        let goals = runtime.coach.snapshot().goals;
        info!("Gym Coach Frontend started OK");
        Model {
            rep_goal_input: goals.rep_goal.to_string(),
            set_goal_input: goals.set_goal.to_string(),
            runtime,
            quit_requested: false,
        }
    }

    /// The consumer side of each repaint: end an expired rest, then read
    pub fn refresh(&self, now: SystemTime) -> Snapshot {
        self.runtime.coach.tick(now);
        self.runtime.coach.snapshot()
    }
}

impl eframe::App for Model {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = SystemTime::now();
        let snapshot = self.refresh(now);

        render_ui(ctx, self, &snapshot, now);

        if self.quit_requested {
            self.runtime.coach.stop();
            frame.close();
        } else {
            ctx.request_repaint_after(self.runtime.presentation_interval());
        }
    }

    fn on_close_event(&mut self) -> bool {
        self.runtime.shutdown();
        true
    }
}
