//! Terminal drawing with ratatui
//!
//! The visual screen shows the canvas with the last log lines and the input
//! line underneath; the terminal screen shows the whole log.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::render::colors::{self, BACKGROUND};
use crate::render::{collect_render_pulses, collect_render_units, RenderPulse, RenderUnit};
use crate::ui::state::{ConsoleState, LogCategory, Screen};
use crate::universe::Universe;

/// Log lines shown under the canvas
const VISUAL_LOG_LINES: u16 = 6;

/// Per-frame buffers, reused between frames
#[derive(Debug, Default)]
pub struct Scene {
    units: Vec<RenderUnit>,
    pulses: Vec<RenderPulse>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }
}

fn rgb(color: colors::Color) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb(r, g, b)
}

pub fn draw(frame: &mut Frame, console: &ConsoleState, universe: &Universe, scene: &mut Scene) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    draw_status_bar(frame, chunks[0], console, universe);
    match console.screen {
        Screen::Visual => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(VISUAL_LOG_LINES + 2)])
                .split(chunks[1]);
            draw_canvas(frame, body[0], universe, scene);
            draw_log(frame, body[1], console, VISUAL_LOG_LINES as usize);
        }
        Screen::Terminal => {
            let visible = chunks[1].height.saturating_sub(2) as usize;
            draw_log(frame, chunks[1], console, visible);
        }
    }
    draw_input(frame, chunks[2], console);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, console: &ConsoleState, universe: &Universe) {
    let status = universe.status();
    let (state_label, state_color) = if status.paused {
        ("■ PAUSADO", Color::Yellow)
    } else {
        ("▶ RODANDO", Color::Green)
    };
    let screen_label = match console.screen {
        Screen::Visual => "visual",
        Screen::Terminal => "terminal",
    };

    let line = Line::from(vec![
        Span::styled(" Dado Universe ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        Span::styled(state_label, Style::default().fg(state_color).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  tick {}", status.tick), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("  dados {}", status.live_units), Style::default().fg(Color::Cyan)),
        Span::styled(format!("  mortos {}", status.dead_units), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("  pulsos {}", status.pulses), Style::default().fg(Color::Blue)),
        Span::styled(format!("  energia {:.2}", status.total_energy), Style::default().fg(Color::Yellow)),
        Span::styled(format!("  escala {:.2}", status.time_scale), Style::default().fg(Color::White)),
        Span::styled(format!("  [{}] Tab alterna", screen_label), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_canvas(frame: &mut Frame, area: Rect, universe: &Universe, scene: &mut Scene) {
    collect_render_units(universe, &mut scene.units);
    collect_render_pulses(universe, &mut scene.pulses);

    let width = f64::from(universe.config().canvas.width);
    let height = f64::from(universe.config().canvas.height);
    // Canvas y grows upwards; the universe's grows downwards
    let flip = |y: f32| height - f64::from(y);

    let units = &scene.units;
    let pulses = &scene.pulses;
    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(" Universo ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .background_color(rgb(BACKGROUND))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for pulse in pulses {
                ctx.draw(&CanvasLine {
                    x1: f64::from(pulse.origin.x),
                    y1: flip(pulse.origin.y),
                    x2: f64::from(pulse.destination.x),
                    y2: flip(pulse.destination.y),
                    color: Color::Rgb(60, 60, 60),
                });
            }
            ctx.layer();
            for unit in units {
                ctx.draw(&Circle {
                    x: f64::from(unit.position.x),
                    y: flip(unit.position.y),
                    radius: f64::from(unit.radius),
                    color: rgb(unit.color),
                });
            }
            for pulse in pulses {
                ctx.draw(&Points {
                    coords: &[(f64::from(pulse.position.x), flip(pulse.position.y))],
                    color: rgb(pulse.color),
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_log(frame: &mut Frame, area: Rect, console: &ConsoleState, count: usize) {
    let lines: Vec<Line> = console
        .tail(count)
        .map(|entry| {
            let style = match entry.category {
                LogCategory::Command => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                LogCategory::Response => Style::default().fg(Color::White),
                LogCategory::Event => Style::default().fg(Color::Yellow),
                LogCategory::System => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.message.as_str(), style))
        })
        .collect();

    let log = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Console ({}) ", console.log.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(log, area);
}

fn draw_input(frame: &mut Frame, area: Rect, console: &ConsoleState) {
    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Magenta)),
        Span::raw(console.input.as_str()),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ]);
    let input = Paragraph::new(line).block(
        Block::default()
            .title(" Comando (help, Ctrl+C sai) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(input, area);
}
