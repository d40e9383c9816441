use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::metrics::{format_compact_number, format_time_ms};
use crate::particles::Particle;
use crate::session::Outcome;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Converts a particle hue (degrees) plus remaining-life alpha into a
/// terminal color. Saturation/value are fixed; alpha fades to black.
pub fn particle_color(hue: f64, alpha: f64) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let a = alpha.clamp(0.0, 1.0);
    Color::Rgb(
        (r * a * 255.0) as u8,
        (g * a * 255.0) as u8,
        (b * a * 255.0) as u8,
    )
}

fn render_particles(particles: &[Particle], area: Rect, buf: &mut Buffer) {
    for p in particles {
        let col = p.x.round();
        let row = p.y.round();
        if col < 0.0 || row < 0.0 {
            continue;
        }
        let (col, row) = (col as u16, row as u16);
        if col < area.width && row < area.height {
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol(if p.size >= 6.0 { "●" } else { "·" });
                cell.set_fg(particle_color(p.hue, p.alpha * p.life_fraction()));
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let green_bold = Style::default().patch(bold).fg(Color::Green);
        let red_bold = Style::default().patch(bold).fg(Color::Red);
        let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);
        let cursor_style = Style::default()
            .patch(dim_bold)
            .add_modifier(Modifier::UNDERLINED);

        match self.state {
            AppState::Typing => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(1), // stats line
                            Constraint::Min(3),    // prompt
                            Constraint::Length(1), // timer
                        ]
                        .as_ref(),
                    )
                    .split(area);

                let snap = self.exercise.snapshot();
                let stats_line = Line::from(vec![
                    Span::styled(format!("{:>3.0} wpm", snap.wpm), bold),
                    Span::raw("  "),
                    Span::styled(format!("{:>5.1}% acc", snap.accuracy), bold),
                    Span::raw("  "),
                    Span::styled(
                        format!("combo {} (x{})", snap.combo, snap.multiplier),
                        if snap.multiplier > 1 { green_bold } else { bold },
                    ),
                    Span::raw("  "),
                    Span::styled(format!("score {}", format_compact_number(snap.score)), bold),
                ]);
                Paragraph::new(stats_line)
                    .alignment(Alignment::Center)
                    .render(chunks[0], buf);

                let mut spans: Vec<Span> = (0..self.exercise.cursor())
                    .map(|idx| {
                        let expected = self.exercise.expected_char(idx).unwrap_or(' ');
                        match self.exercise.outcome_at(idx) {
                            Some(Outcome::Incorrect) => Span::styled(
                                match expected {
                                    ' ' => "·".to_owned(),
                                    c => c.to_string(),
                                },
                                red_bold,
                            ),
                            _ => Span::styled(expected.to_string(), green_bold),
                        }
                    })
                    .collect();

                if let Some(at_cursor) = self.exercise.expected_char(self.exercise.cursor()) {
                    spans.push(Span::styled(at_cursor.to_string(), cursor_style));
                    let rest: String = (self.exercise.cursor() + 1..self.exercise.prompt_len())
                        .filter_map(|idx| self.exercise.expected_char(idx))
                        .collect();
                    spans.push(Span::styled(rest, dim_bold));
                }

                Paragraph::new(Line::from(spans))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(chunks[1], buf);

                Paragraph::new(Span::styled(format_time_ms(snap.elapsed_ms), dim_bold))
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);

                render_particles(self.particles.particles(), area, buf);
            }
            AppState::Results => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(2), // run summary
                            Constraint::Length(1), // lifetime stats
                            Constraint::Min(3),    // mistakes + leaderboard
                            Constraint::Length(1), // legend
                        ]
                        .as_ref(),
                    )
                    .split(area);

                if let Some(run) = &self.last_run {
                    let summary = Line::from(vec![
                        Span::styled(format!("{:.0} wpm", run.wpm), green_bold),
                        Span::raw("   "),
                        Span::styled(format!("{:.1}% accuracy", run.accuracy), bold),
                        Span::raw("   "),
                        Span::styled(format!("score {}", run.score), bold),
                        Span::raw("   "),
                        Span::styled(format!("max combo {}", run.max_combo), bold),
                        Span::raw("   "),
                        Span::styled(format!("{}", run.difficulty), dim_bold),
                    ]);
                    Paragraph::new(summary)
                        .alignment(Alignment::Center)
                        .render(chunks[0], buf);
                }

                let stats = &self.payload.stats;
                let lifetime = Line::from(Span::styled(
                    format!(
                        "lifetime: {} runs, best {:.0} wpm, best combo {}, total score {}",
                        stats.games_played,
                        stats.best_wpm,
                        stats.best_combo,
                        format_compact_number(stats.total_score),
                    ),
                    dim_bold,
                ));
                Paragraph::new(lifetime)
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);

                let mut lines: Vec<Line> = Vec::new();
                let top_mistakes = self.exercise.mistake_tracker().top(5);
                if !top_mistakes.is_empty() {
                    lines.push(Line::from(Span::styled("trouble keys", bold)));
                    for (label, count) in top_mistakes {
                        lines.push(Line::from(Span::styled(
                            format!("{label}: {count}"),
                            red_bold,
                        )));
                    }
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled("best runs", bold)));
                for entry in self.payload.leaderboard.iter().take(5) {
                    lines.push(Line::from(Span::raw(format!(
                        "{} [{}]  {:.0} wpm  {:.1}%  score {}",
                        entry.game_id, entry.difficulty, entry.wpm, entry.accuracy, entry.score,
                    ))));
                }
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);

                Paragraph::new(Span::styled(
                    "(r)etry / (n)ew / (esc)ape",
                    Style::default().add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
            }
        }
    }
}
