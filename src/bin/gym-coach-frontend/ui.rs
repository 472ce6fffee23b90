use std::time::SystemTime;

use egui::{
    Color32, ComboBox, Grid, ProgressBar, RichText, Ui,
    plot::{Line, MarkerShape, Plot, PlotPoints, Points},
};

use log::debug;

use gym_coach::{
    exercises::{Exercise, Feedback, Severity},
    landmarks::{JointId, LandmarkFrame},
    presentation::{feedback_line, overlay_text, phase_label, progress},
    snapshot::Snapshot,
};

use crate::model::Model;

pub const SPACING_AMOUNT: f32 = 16.0;

const BONES: [(JointId, JointId); 12] = [
    (JointId::LeftShoulder, JointId::RightShoulder),
    (JointId::LeftShoulder, JointId::LeftElbow),
    (JointId::LeftElbow, JointId::LeftWrist),
    (JointId::RightShoulder, JointId::RightElbow),
    (JointId::RightElbow, JointId::RightWrist),
    (JointId::LeftShoulder, JointId::LeftHip),
    (JointId::RightShoulder, JointId::RightHip),
    (JointId::LeftHip, JointId::RightHip),
    (JointId::LeftHip, JointId::LeftKnee),
    (JointId::LeftKnee, JointId::LeftAnkle),
    (JointId::RightHip, JointId::RightKnee),
    (JointId::RightKnee, JointId::RightAnkle),
];

pub fn render_ui(ctx: &egui::Context, model: &mut Model, snapshot: &Snapshot, now: SystemTime) {
    egui::SidePanel::left("controls").show(ctx, |ui| {
        ui.add_space(SPACING_AMOUNT);
        render_controls(model, snapshot, ui);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        render_stats(snapshot, ui);
        ui.add(ProgressBar::new(progress(snapshot)).show_percentage());
        ui.add_space(SPACING_AMOUNT);

        match overlay_text(snapshot, now) {
            Some(text) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(SPACING_AMOUNT * 4.);
                    ui.label(RichText::new(text).size(64.).color(Color32::LIGHT_GREEN));
                });
            }
            None => render_skeleton(snapshot, ui),
        }

        ui.add_space(SPACING_AMOUNT);
        render_feedback(&feedback_line(snapshot, now), ui);
        if model.runtime.producer_finished() && !model.quit_requested {
            ui.label(RichText::new("No more frames from the source.").italics());
        }
    });
}

fn render_controls(model: &mut Model, snapshot: &Snapshot, ui: &mut Ui) {
    ui.heading("Exercise");
    let mut selected = snapshot.exercise;
    ComboBox::from_id_source("exercise")
        .selected_text(selected.name())
        .show_ui(ui, |ui| {
            for exercise in Exercise::ALL {
                ui.selectable_value(&mut selected, exercise, exercise.name());
            }
        });
    if selected != snapshot.exercise {
        model.runtime.coach.select_exercise(selected);
    }

    ui.separator();
    ui.heading("Goals");
    Grid::new("goals_grid").show(ui, |ui| {
        ui.label("Reps per set");
        ui.text_edit_singleline(&mut model.rep_goal_input);
        ui.end_row();

        ui.label("Sets");
        ui.text_edit_singleline(&mut model.set_goal_input);
        ui.end_row();
    });
    if ui.button("Set goals").clicked() {
        match model
            .runtime
            .coach
            .apply_goal_input(&model.rep_goal_input, &model.set_goal_input)
        {
            Ok(goals) => {
                // Blank fields took the current value; show what is in effect
                model.rep_goal_input = goals.rep_goal.to_string();
                model.set_goal_input = goals.set_goal.to_string();
            }
            Err(e) => debug!("Goal input not applied: {}", e),
        }
    }

    ui.separator();
    if ui.button("Reset workout").clicked() {
        model.runtime.coach.reset();
    }
    if ui.button("Quit").clicked() {
        model.quit_requested = true;
    }
}

fn render_stats(snapshot: &Snapshot, ui: &mut Ui) {
    Grid::new("stats_grid")
        .num_columns(3)
        .spacing([SPACING_AMOUNT * 4., 4.])
        .show(ui, |ui| {
            ui.label("SETS");
            ui.label("REPS");
            ui.label("STAGE");
            ui.end_row();

            let big = |text: String| RichText::new(text).size(32.);
            ui.label(big(format!(
                "{}/{}",
                snapshot.set_count, snapshot.goals.set_goal
            )));
            ui.label(big(format!(
                "{}/{}",
                snapshot.rep_count, snapshot.goals.rep_goal
            )));
            ui.label(big(phase_label(snapshot)));
            ui.end_row();
        });
}

fn render_feedback(feedback: &Feedback, ui: &mut Ui) {
    let color = match feedback.severity {
        Severity::Info => Color32::LIGHT_BLUE,
        Severity::Success => Color32::LIGHT_GREEN,
        Severity::Warning => Color32::LIGHT_RED,
    };
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(&feedback.text).size(24.).color(color));
    });
}

/// Image space has y growing downwards; the plot flips it
fn to_plot([x, y]: [f32; 2]) -> [f64; 2] {
    [x as f64, -y as f64]
}

fn render_skeleton(snapshot: &Snapshot, ui: &mut Ui) {
    let (width, height) = snapshot
        .frame
        .as_ref()
        .map(|f| (f.width as f64, f.height as f64))
        .unwrap_or((640., 480.));

    let plot = Plot::new("skeleton")
        .data_aspect(1.0)
        .height(ui.available_height() - SPACING_AMOUNT * 4.)
        .include_x(0.)
        .include_x(width)
        .include_y(0.)
        .include_y(-height)
        .show_axes([false, false]);

    plot.show(ui, |plot_ui| {
        for line in bone_lines(&snapshot.landmarks) {
            plot_ui.line(line);
        }
        let joints: Vec<[f64; 2]> = snapshot
            .landmarks
            .landmarks()
            .iter()
            .filter(|l| l.x.is_finite() && l.y.is_finite())
            .map(|l| to_plot([l.x, l.y]))
            .collect();
        plot_ui.points(
            Points::new(PlotPoints::new(joints))
                .filled(true)
                .radius(4.)
                .shape(MarkerShape::Circle)
                .color(Color32::YELLOW),
        );
    });
}

fn bone_lines(landmarks: &LandmarkFrame) -> Vec<Line> {
    BONES
        .iter()
        .filter_map(|(a, b)| {
            let (ax, ay) = landmarks.get(*a)?;
            let (bx, by) = landmarks.get(*b)?;
            Some(
                Line::new(PlotPoints::new(vec![to_plot([ax, ay]), to_plot([bx, by])]))
                    .color(Color32::WHITE)
                    .width(2.),
            )
        })
        .collect()
}
