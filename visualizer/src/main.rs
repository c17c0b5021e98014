use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, text, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Subscription, Task,
    Theme,
};
use sonarcore::audio::SynthAudio;
use sonarcore::interface::{SonarSnapshot, CARRIER_KHZ, DISTANCE_RINGS_M};
use sonarcore::math::SeededRandom;
use sonarcore::prelude::SWEEP_INTERVAL_MS;
use sonarcore::scheduler::VirtualScheduler;
use sonarcore::{Millis, SimulationParams, SonarLoop, SonarTask};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const SAMPLE_RATE: u32 = 44_100;
const MAX_RANGE_M: f32 = DISTANCE_RINGS_M[DISTANCE_RINGS_M.len() - 1];
const PHOSPHOR: Color = Color::from_rgb(0.25, 1.0, 0.45);

type ScopeSonar = SonarLoop<VirtualScheduler<SonarTask>, SeededRandom, SynthAudio>;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Echolocation Sonar".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    // The janitor keeps running in standby, so the clock always ticks.
    time::every(Duration::from_millis(SWEEP_INTERVAL_MS)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    sonar: ScopeSonar,
    started: Instant,
    snapshot: SonarSnapshot,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ToggleScan,
    ManualPing,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_nanos() as u64)
            .unwrap_or_default();
        let sonar = SonarLoop::new(
            SimulationParams::default(),
            VirtualScheduler::new(),
            SeededRandom::new(seed),
            SynthAudio::new(SAMPLE_RATE),
        )
        .expect("default simulation parameters are valid");
        let snapshot = sonar.snapshot();

        (
            Visualizer {
                sonar,
                started: Instant::now(),
                snapshot,
            },
            Task::none(),
        )
    }

    fn elapsed(&self) -> Millis {
        self.started.elapsed().as_millis() as Millis
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        state.sonar.advance_to(state.elapsed());
        match message {
            Message::Tick => {}
            Message::ToggleScan => {
                let next = !state.sonar.is_active();
                state.sonar.set_active(next);
            }
            Message::ManualPing => {
                state.sonar.emit();
            }
        }
        state.snapshot = state.sonar.snapshot();
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let snapshot = &state.snapshot;

        let header = row![
            text(format!("● {}", snapshot.status_label()))
                .size(16)
                .width(Length::FillPortion(1)),
            column![
                text("ECHOLOCATION SONAR").size(28),
                text("BAT NAVIGATION SYSTEM").size(12),
            ]
            .align_x(Alignment::Center)
            .width(Length::FillPortion(2)),
            column![
                text("PULSES").size(12),
                text(snapshot.pulse_counter_label()).size(24),
            ]
            .align_x(Alignment::End)
            .width(Length::FillPortion(1)),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let scope = Canvas::new(SonarScope {
            snapshot: snapshot.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(520.0));

        let bars: String = snapshot
            .echo_bars()
            .iter()
            .map(|lit| if *lit { '█' } else { '░' })
            .collect();

        let info_panel = column![
            text("DETECTED OBJECTS").size(14),
            text(snapshot.objects.len().to_string()).size(32),
            text("ECHO STRENGTH").size(14),
            text(bars).size(20),
            text("FREQUENCY").size(14),
            text(format!("{CARRIER_KHZ} kHz")).size(24),
        ]
        .spacing(8)
        .padding(16)
        .width(Length::Fixed(220.0));

        let (label, hint) = if snapshot.active {
            (
                "◼ CEASE SCAN",
                "Sonar pulses emitting... detecting obstacles",
            )
        } else {
            (
                "▶ INITIATE SONAR",
                "Activate echolocation for spatial awareness",
            )
        };

        let controls = column![
            row![
                button(text(label)).on_press(Message::ToggleScan).padding(12),
                button("PING").on_press(Message::ManualPing).padding(12),
            ]
            .spacing(12),
            text(hint).size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let layout = column![
            header,
            row![scope, info_panel]
                .spacing(20)
                .align_y(Alignment::Start),
            controls,
        ]
        .spacing(16)
        .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Point at `radius` along a compass bearing (0 = up, clockwise).
fn bearing_point(center: Point, radius: f32, bearing_deg: f32) -> Point {
    let radians = bearing_deg.to_radians();
    Point::new(
        center.x + radius * radians.sin(),
        center.y - radius * radians.cos(),
    )
}

fn scope_text(content: &str, position: Point, color: Color, size: f32) -> canvas::Text {
    canvas::Text {
        content: content.to_string(),
        position,
        color,
        size: Pixels(size),
        ..canvas::Text::default()
    }
}

#[derive(Clone)]
struct SonarScope {
    snapshot: SonarSnapshot,
}

impl canvas::Program<Message> for SonarScope {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let snapshot = &self.snapshot;
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.01, 0.04, 0.03),
        );

        let center = frame.center();
        let radius = (bounds.width.min(bounds.height) / 2.0 - 28.0).max(10.0);
        let grid = Color::from_rgba(0.25, 1.0, 0.45, 0.25);

        for ring_m in DISTANCE_RINGS_M {
            let ring_radius = radius * ring_m / MAX_RANGE_M;
            frame.stroke(
                &Path::circle(center, ring_radius),
                Stroke::default().with_color(grid).with_width(1.0),
            );
            frame.fill_text(scope_text(
                &format!("{ring_m:.0}m"),
                Point::new(center.x + 4.0, center.y - ring_radius - 14.0),
                grid,
                11.0,
            ));
        }

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(center.x - radius, center.y));
            builder.line_to(Point::new(center.x + radius, center.y));
            builder.move_to(Point::new(center.x, center.y - radius));
            builder.line_to(Point::new(center.x, center.y + radius));
        });
        frame.stroke(&axes, Stroke::default().with_color(grid).with_width(1.0));

        for (marker, bearing) in [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)] {
            let at = bearing_point(center, radius + 14.0, bearing);
            frame.fill_text(scope_text(
                marker,
                Point::new(at.x - 5.0, at.y - 8.0),
                PHOSPHOR,
                14.0,
            ));
        }

        for pulse in &snapshot.pulses {
            let progress = snapshot.pulse_progress(pulse);
            let ring = Path::circle(center, (radius * progress).max(1.0));
            frame.stroke(
                &ring,
                Stroke::default()
                    .with_color(Color::from_rgba(0.25, 1.0, 0.45, 1.0 - progress))
                    .with_width(2.0),
            );
        }

        if snapshot.active {
            // Fading trail behind the sweep line.
            for step in (1..=12).rev() {
                let trail = snapshot.sweep_angle - step as f32 * 2.0;
                let alpha = 0.3 * (1.0 - step as f32 / 13.0);
                frame.stroke(
                    &Path::line(center, bearing_point(center, radius, trail)),
                    Stroke::default()
                        .with_color(Color::from_rgba(0.25, 1.0, 0.45, alpha))
                        .with_width(3.0),
                );
            }
            frame.stroke(
                &Path::line(center, bearing_point(center, radius, snapshot.sweep_angle)),
                Stroke::default().with_color(PHOSPHOR).with_width(2.0),
            );
        }

        for object in &snapshot.objects {
            let opacity = snapshot.object_opacity(object);
            let at = bearing_point(center, radius * object.distance / MAX_RANGE_M, object.angle);
            frame.fill(
                &Path::circle(at, object.size / 2.0),
                Color::from_rgba(0.4, 1.0, 0.6, opacity),
            );
            frame.stroke(
                &Path::circle(at, object.size),
                Stroke::default()
                    .with_color(Color::from_rgba(0.4, 1.0, 0.6, opacity * 0.4))
                    .with_width(1.0),
            );
        }

        let emitter = if snapshot.echo_active {
            Color::from_rgb(0.8, 1.0, 0.85)
        } else if snapshot.active {
            PHOSPHOR
        } else {
            Color::from_rgb(0.15, 0.4, 0.25)
        };
        frame.fill(&Path::circle(center, 9.0), emitter);

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn bearings_follow_compass_orientation() {
        let center = Point::new(100.0, 100.0);
        assert!(close(bearing_point(center, 50.0, 0.0), Point::new(100.0, 50.0)));
        assert!(close(bearing_point(center, 50.0, 90.0), Point::new(150.0, 100.0)));
        assert!(close(bearing_point(center, 50.0, 180.0), Point::new(100.0, 150.0)));
        assert!(close(bearing_point(center, 50.0, 270.0), Point::new(50.0, 100.0)));
    }

    #[test]
    fn outer_ring_matches_max_detection_range() {
        assert_eq!(MAX_RANGE_M, 55.0);
    }
}
