use ondot::{
    celebration::{Burst, Celebration, CelebrationTone},
    grade::Tone,
    history::HistoryItem,
    presenter::{Presenter, Readout, ReadoutPhase, EMPTY_HISTORY_TEXT},
    stats::StatRow,
    target::Target,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const BANNER_WIDTH: u16 = 36;
const BANNER_HEIGHT: u16 = 4;

const LEGEND: &str = "space start/stop · n random target · ←/→ tune · f focus · q/esc quit";

/// Terminal front end: keeps whatever the game last reported and draws it on demand
#[derive(Debug, Default)]
pub struct TerminalView {
    stats: Vec<StatRow>,
    status: String,
    history: Vec<HistoryItem>,
    readout: Readout,
    target: Option<Target>,
    focus: bool,
    celebration: Option<Celebration>,
    burst: Burst,
    width: u16,
    height: u16,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            width: 80,
            height: 24,
            ..Self::default()
        }
    }

    pub fn set_area(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Advance the spark effect by `dt` seconds. Returns whether it still needs frames.
    pub fn animate(&mut self, dt: f64) -> bool {
        if !self.burst.is_active() {
            return false;
        }
        self.burst.step(dt);
        true
    }
}

impl Presenter for TerminalView {
    fn render_stats(&mut self, rows: &[StatRow]) {
        self.stats = rows.to_vec();
    }

    fn render_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn render_history(&mut self, items: &[HistoryItem]) {
        self.history = items.to_vec();
    }

    fn render_readout(&mut self, readout: &Readout) {
        self.readout = *readout;
    }

    fn render_target(&mut self, target: Target) {
        self.target = Some(target);
    }

    fn render_focus(&mut self, enabled: bool) {
        self.focus = enabled;
    }

    fn render_celebration(&mut self, celebration: Option<&Celebration>) {
        match celebration {
            Some(banner) => {
                self.burst
                    .ignite(banner.tone, self.width, self.height, &mut rand::thread_rng());
                self.celebration = Some(banner.clone());
            }
            None => {
                self.burst.extinguish();
                self.celebration = None;
            }
        }
    }
}

fn tone_color(tone: CelebrationTone) -> Color {
    match tone {
        CelebrationTone::S => Color::Yellow,
        CelebrationTone::A => Color::Cyan,
        CelebrationTone::B => Color::Green,
        CelebrationTone::Best => Color::Magenta,
    }
}

fn history_style(tone: Tone) -> Style {
    match tone {
        Tone::Positive => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Tone::Bright => Style::default().fg(Color::Cyan),
        Tone::Plain => Style::default(),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl TerminalView {
    fn render_readout_panel(&self, area: Rect, buf: &mut Buffer) {
        let style = match (self.readout.phase, self.readout.pulse) {
            (ReadoutPhase::Stopped, true) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            (ReadoutPhase::Stopped, false) => Style::default().add_modifier(Modifier::BOLD),
            (ReadoutPhase::Running, _) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            (ReadoutPhase::Idle, _) => Style::default().add_modifier(Modifier::DIM),
        };
        let title = if self.readout.phase == ReadoutPhase::Running {
            " elapsed · running "
        } else {
            " elapsed "
        };
        Paragraph::new(Span::styled(self.readout.text(), style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(area, buf);
    }

    fn render_gauge(&self, area: Rect, buf: &mut Buffer) {
        let ratio = self.readout.progress.clamp(0.0, 1.0);
        let color = if self.readout.progress >= 1.0 {
            Color::Red
        } else {
            Color::Green
        };
        LineGauge::default()
            .filled_style(Style::default().fg(color))
            .label("")
            .ratio(ratio)
            .render(area, buf);
    }

    fn render_target_line(&self, area: Rect, buf: &mut Buffer) {
        let target = self
            .target
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        let focus = if self.focus { "ON" } else { "OFF" };
        let line = Line::from(vec![
            Span::raw("Target "),
            Span::styled(target, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    Focus mode: "),
            Span::styled(
                focus,
                Style::default()
                    .fg(if self.focus { Color::Magenta } else { Color::DarkGray })
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(line).alignment(Alignment::Center).render(area, buf);
    }

    fn render_stats_panel(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .stats
            .iter()
            .map(|row| {
                Line::from(vec![
                    Span::raw(format!("{:<11}", row.label)),
                    Span::styled(row.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ])
            })
            .collect();
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Score "))
            .render(area, buf);
    }

    fn render_history_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" History ")
            .title_bottom(Line::from(" last 5 ").right_aligned());

        if self.history.is_empty() {
            Paragraph::new(Span::styled(
                EMPTY_HISTORY_TEXT,
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            ))
            .block(block)
            .render(area, buf);
            return;
        }

        let label_width = self
            .history
            .iter()
            .map(|item| item.label.width())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = self
            .history
            .iter()
            .map(|item| {
                let pad = " ".repeat(label_width - item.label.width() + 2);
                Line::from(vec![
                    Span::raw(format!("{}{pad}", item.label)),
                    Span::styled(item.value.clone(), history_style(item.tone)),
                ])
            })
            .collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_banner(&self, area: Rect, buf: &mut Buffer) {
        for spark in &self.burst.sparks {
            if spark.x < 0.0 || spark.y < 0.0 {
                continue;
            }
            let (x, y) = (spark.x as u16, spark.y as u16);
            if x >= area.right() || y >= area.bottom() {
                continue;
            }
            let color = self.burst.tone.map_or(Color::White, tone_color);
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(spark.symbol).set_fg(color);
            }
        }

        let Some(banner) = &self.celebration else {
            return;
        };
        let color = tone_color(banner.tone);
        let banner_area = centered(area, BANNER_WIDTH, BANNER_HEIGHT);
        Clear.render(banner_area, buf);
        Paragraph::new(vec![
            Line::from(Span::styled(
                banner.title.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(banner.subtitle.clone()),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .render(banner_area, buf);
    }
}

impl Widget for &TerminalView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(3), // readout
                Constraint::Length(1), // gauge
                Constraint::Length(1), // target + focus
                Constraint::Min(7),    // stats | history
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "ondot · precision stopwatch drill",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        self.render_readout_panel(chunks[1], buf);
        self.render_gauge(chunks[2], buf);
        self.render_target_line(chunks[3], buf);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[4]);
        self.render_stats_panel(panels[0], buf);
        self.render_history_panel(panels[1], buf);

        Paragraph::new(Span::styled(
            self.status.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        Paragraph::new(Span::styled(LEGEND, Style::default().add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        self.render_banner(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ondot::clock::ManualClock;
    use ondot::config::Config;
    use ondot::presenter::CONCEALED_TEXT;
    use ondot::Challenge;

    fn rendered(view: &TerminalView, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn create_test_challenge() -> (ManualClock, Challenge<ManualClock, TerminalView>) {
        let clock = ManualClock::new();
        let config = Config {
            seed: Some(5),
            ..Config::default()
        };
        let challenge = Challenge::with_target(clock.clone(), TerminalView::new(), config, 3.0);
        (clock, challenge)
    }

    #[test]
    fn fresh_session_shows_empty_history_state() {
        let (_clock, challenge) = create_test_challenge();
        let text = rendered(challenge.presenter(), 100, 30);
        assert!(text.contains(EMPTY_HISTORY_TEXT));
        assert!(text.contains("3.00s"));
        assert!(text.contains("Best Diff"));
        assert!(text.contains("0.000s"));
    }

    #[test]
    fn stopped_attempt_appears_in_history() {
        let (clock, mut challenge) = create_test_challenge();
        challenge.start_or_stop();
        clock.advance_secs(3.25);
        challenge.start_or_stop();
        let text = rendered(challenge.presenter(), 100, 30);
        assert!(!text.contains(EMPTY_HISTORY_TEXT));
        assert!(text.contains("#1"));
        assert!(text.contains("3.250s"));
    }

    #[test]
    fn focus_mode_conceals_running_readout() {
        let (clock, mut challenge) = create_test_challenge();
        challenge.toggle_focus_mode();
        challenge.start_or_stop();
        clock.advance_secs(0.5);
        challenge.on_tick();
        // The banner would sit over the readout; let it expire first.
        clock.advance_secs(2.0);
        challenge.on_tick();
        let text = rendered(challenge.presenter(), 100, 30);
        assert!(text.contains(CONCEALED_TEXT));
        assert!(text.contains("ON"));
        assert!(!text.contains("2.500s"));
    }

    #[test]
    fn celebration_banner_is_drawn_and_burst_animates() {
        let (clock, mut challenge) = create_test_challenge();
        challenge.start_or_stop();
        clock.advance_secs(3.0);
        challenge.start_or_stop();
        assert!(rendered(challenge.presenter(), 100, 30).contains("S RANK"));
        assert!(challenge.presenter_mut().animate(0.1));
    }

    #[test]
    fn renders_into_tiny_and_odd_areas() {
        let (_clock, challenge) = create_test_challenge();
        for (w, h) in [(1, 1), (10, 3), (200, 5), (20, 50)] {
            let area = Rect::new(0, 0, w, h);
            let mut buffer = Buffer::empty(area);
            challenge.presenter().render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn legend_lists_quit_keys() {
        let (_clock, challenge) = create_test_challenge();
        let text = rendered(challenge.presenter(), 120, 30);
        assert!(text.contains("q/esc quit"));
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 20, 3);
        let inner = centered(area, BANNER_WIDTH, BANNER_HEIGHT);
        assert_eq!(inner.width, 20);
        assert_eq!(inner.height, 3);
    }
}
