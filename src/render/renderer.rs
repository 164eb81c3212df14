use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Element, FoodTag, GameEngine, Phase, Position, catalog};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(engine, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match engine.phase() {
            Phase::Menu => frame.render_widget(self.render_menu(engine), game_area),
            Phase::Playing => frame.render_widget(self.render_grid(engine), game_area),
            Phase::Paused => {
                frame.render_widget(self.render_grid(engine), game_area);
                let popup = centered(game_area, 24, 5);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_paused(), popup);
            }
            Phase::GameOver => {
                frame.render_widget(self.render_game_over(engine, metrics), game_area)
            }
        }

        frame.render_widget(self.render_controls(engine.phase()), chunks[2]);
    }

    fn render_grid(&self, engine: &GameEngine) -> Paragraph<'_> {
        let config = engine.config();
        let (width, height) = (config.grid_width, config.grid_height);
        let empty = Span::styled(". ", Style::default().fg(Color::DarkGray));
        let mut cells: Vec<Span<'static>> = vec![empty; width * height];
        let mut put = |pos: Position, span: Span<'static>| {
            if pos.in_bounds(width, height) {
                cells[pos.y as usize * width + pos.x as usize] = span;
            }
        };

        for food in engine.foods().iter() {
            put(food.position, food_span(&food.tag));
        }
        for food in engine.elements().iter() {
            put(
                food.position,
                Span::styled(
                    element_glyph(food.element),
                    Style::default()
                        .fg(element_color(food.element))
                        .add_modifier(Modifier::BOLD),
                ),
            );
        }
        // Body before head so the head wins on a self-collision frame
        for segment in engine.snake().segments().skip(1) {
            put(segment.position, Span::styled("□ ", Style::default().fg(Color::Green)));
        }
        if let Some(head) = engine.snake().head() {
            put(
                head,
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        }

        let lines: Vec<Line> = cells
            .chunks(width.max(1))
            .map(|row| Line::from(row.to_vec()))
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Elemental Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, engine: &GameEngine, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let summary = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(engine.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(engine.snake().len().to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ]);

        let mut status = vec![Span::styled("Effects: ", label)];
        if engine.active_effects().is_empty() {
            status.push(Span::styled("none", Style::default().fg(Color::DarkGray)));
        }
        for (i, active) in engine.active_effects().iter().enumerate() {
            if i > 0 {
                status.push(Span::raw(", "));
            }
            status.push(Span::styled(
                format!("{} ({})", active.effect.name, active.remaining),
                Style::default().fg(element_color(active.effect.element)),
            ));
        }
        if let Some(reaction) = engine.last_reaction() {
            status.push(Span::raw("    "));
            status.push(Span::styled("Reaction: ", label));
            status.push(Span::styled(
                format!(
                    "{} ({} + {}, +{})",
                    reaction.kind.name(),
                    reaction.first.name(),
                    reaction.second.name(),
                    reaction.bonus
                ),
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![summary, Line::from(status)];
        if let Some(tag) = metrics.last_tagged {
            lines.push(Line::from(vec![
                Span::styled("Last: ", label),
                Span::styled(
                    catalog::label(&tag),
                    Style::default().fg(element_color(tag.element)),
                ),
                Span::raw(format!(
                    " {} (strength {})",
                    catalog::describe(&tag),
                    catalog::effect_value(&tag)
                )),
            ]));
        }
        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn render_menu(&self, engine: &GameEngine) -> Paragraph<'_> {
        let config = engine.config();
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "ELEMENTAL SNAKE",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "{}x{} grid, up to {} food and {} element food",
                config.grid_width,
                config.grid_height,
                config.max_food_count,
                config.max_element_food_count
            )),
            Line::from(""),
        ];
        for element in Element::ACTIVE {
            text.push(Line::from(vec![
                Span::styled(
                    element_glyph(element),
                    Style::default()
                        .fg(element_color(element))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(element.name()),
            ]));
        }
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_paused(&self) -> Paragraph<'_> {
        Paragraph::new(vec![
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Space to resume", Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, engine: &GameEngine, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!(
                "Games: {}   Food eaten: {}   Reactions: {}",
                metrics.games_played, metrics.foods_eaten, metrics.reactions_triggered
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        match phase {
            Phase::Menu => spans.push(Span::styled("Enter", Style::default().fg(Color::Green))),
            Phase::Playing | Phase::Paused => {
                spans.push(Span::styled("Space", Style::default().fg(Color::Yellow)))
            }
            Phase::GameOver => spans.push(Span::styled("R", Style::default().fg(Color::Green))),
        }
        spans.push(Span::raw(match phase {
            Phase::Menu => " to start | ",
            Phase::Playing | Phase::Paused => " to pause | ",
            Phase::GameOver => " to restart | ",
        }));
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn element_color(element: Element) -> Color {
    match element {
        Element::None => Color::Red,
        Element::Wind => Color::Green,
        Element::Fire => Color::LightRed,
        Element::Electric => Color::Magenta,
        Element::Ice => Color::LightCyan,
        Element::Water => Color::Blue,
    }
}

fn element_glyph(element: Element) -> &'static str {
    match element {
        Element::None => "O ",
        Element::Wind => "~ ",
        Element::Fire => "^ ",
        Element::Electric => "z ",
        Element::Ice => "* ",
        Element::Water => "% ",
    }
}

/// Plain food is a red `O`; tagged food takes its element color, bold from
/// level 3 up, with the level digit as glyph
fn food_span(tag: &FoodTag) -> Span<'static> {
    if !tag.is_special() {
        return Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }
    let mut style = Style::default().fg(element_color(tag.element));
    if tag.level >= 3 {
        style = style.add_modifier(Modifier::BOLD);
    }
    if tag.level >= catalog::MAX_LEVEL {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(format!("{} ", tag.level), style)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
