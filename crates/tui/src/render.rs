use nlq_core::cypher::{CypherToken, TokenKind};
use nlq_core::view::{project, PageView, ResultPanels, RowsView, SchemaCard, SubmitContent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{Focus, TuiApp};

const EMPTY_RESULTS_HINT: &str = "Submit a question to see the generated Cypher query";

pub(crate) fn render(frame: &mut Frame<'_>, app: &TuiApp) {
    let page = project(&app.view);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, &page, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_query_column(frame, app, &page, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::try_from(page.examples.len()).unwrap_or(u16::MAX) + 2),
            Constraint::Min(5),
        ])
        .split(columns[1]);
    render_examples(frame, app, &page, side[0]);
    render_schema(frame, app, &page.schema, side[1]);

    render_footer(frame, app, chunks[2]);

    if app.show_help {
        render_help_popup(frame);
    }
}

fn render_header(frame: &mut Frame<'_>, page: &PageView<'_>, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            page.title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(page.subtitle),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_query_column(frame: &mut Frame<'_>, app: &TuiApp, page: &PageView<'_>, area: Rect) {
    let error_height = if page.error.is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(5),
        ])
        .split(area);

    render_form(frame, app, page, rows[0]);

    if let Some(message) = page.error {
        let error = Paragraph::new(Line::from(vec![
            Span::styled("Error: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(message),
        ]))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(error, rows[1]);
    }

    match &page.results {
        Some(panels) => render_results(frame, app, panels, rows[2]),
        None => {
            let placeholder = Paragraph::new(Line::from(Span::styled(
                EMPTY_RESULTS_HINT,
                Style::default().fg(Color::DarkGray),
            )))
            .block(Block::default().borders(Borders::ALL).title("Results"));
            frame.render_widget(placeholder, rows[2]);
        }
    }
}

fn render_form(frame: &mut Frame<'_>, app: &TuiApp, page: &PageView<'_>, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(12)])
        .split(area);

    let focused = app.focus == Focus::Input;
    let input_style = if page.input.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let inner_width = usize::from(parts[0].width.saturating_sub(2));
    let (content, visible_chars) = if page.input.shows_placeholder() {
        (
            Span::styled(page.input.placeholder, Style::default().fg(Color::DarkGray)),
            0,
        )
    } else {
        let visible = visible_tail(page.input.text, inner_width.saturating_sub(1));
        (Span::styled(visible, input_style), visible.chars().count())
    };

    let input = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Question")
            .border_style(focus_style(focused)),
    );
    frame.render_widget(input, parts[0]);

    if focused && !page.input.disabled {
        let offset = u16::try_from(visible_chars).unwrap_or(u16::MAX);
        frame.set_cursor_position(Position::new(
            parts[0].x.saturating_add(1).saturating_add(offset),
            parts[0].y.saturating_add(1),
        ));
    }

    let (label, label_style) = match page.submit.content {
        SubmitContent::Label(label) => (label, Style::default().add_modifier(Modifier::BOLD)),
        SubmitContent::LoadingIndicator => (app.spinner(), Style::default().fg(Color::Yellow)),
    };
    let button_style = if page.submit.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        label_style.fg(Color::Green)
    };
    let button = Paragraph::new(Line::from(Span::styled(label, button_style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, parts[1]);
}

fn render_results(frame: &mut Frame<'_>, app: &TuiApp, panels: &ResultPanels<'_>, area: Rect) {
    let cypher = cypher_lines(&panels.cypher);
    let cypher_height = u16::try_from(cypher.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height / 3)
        .max(3);
    let explanation_height = if panels.explanation.is_some() { 4 } else { 0 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(cypher_height),
            Constraint::Min(3),
            Constraint::Length(explanation_height),
        ])
        .split(area);

    let cypher = Paragraph::new(cypher)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Generated Cypher Query"),
        );
    frame.render_widget(cypher, rows[0]);

    let body = match &panels.rows {
        RowsView::Json(json) => Paragraph::new(json.as_str()).scroll((app.results_scroll, 0)),
        RowsView::Empty(text) => Paragraph::new(*text),
    };
    let body = body.block(Block::default().borders(Borders::ALL).title("Results"));
    frame.render_widget(body, rows[1]);

    if let Some(explanation) = panels.explanation {
        let explanation = Paragraph::new(explanation)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Explanation"));
        frame.render_widget(explanation, rows[2]);
    }
}

fn render_examples(frame: &mut Frame<'_>, app: &TuiApp, page: &PageView<'_>, area: Rect) {
    let focused = app.focus == Focus::Examples;
    let lines: Vec<Line<'_>> = page
        .examples
        .iter()
        .enumerate()
        .map(|(index, example)| {
            let selected = focused && index == app.selected_example;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{marker} {}. {example}", index + 1),
                style,
            ))
        })
        .collect();

    let examples = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Example Queries")
            .border_style(focus_style(focused)),
    );
    frame.render_widget(examples, area);
}

fn render_schema(frame: &mut Frame<'_>, app: &TuiApp, card: &SchemaCard<'_>, area: Rect) {
    let focused = app.focus == Focus::Schema;
    let trigger_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("[ {} ]", card.trigger_label),
        trigger_style,
    ))];

    if let Some(error) = card.error {
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red),
        )));
    }

    if let Some(listing) = &card.listing {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Nodes:", bold)));
        for node in &listing.nodes {
            lines.push(Line::from(vec![
                Span::raw("• "),
                Span::styled(node.name, bold),
                Span::raw(format!(" ({} nodes)", node.count)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", node.properties),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(Span::styled("Relationships:", bold)));
        for relationship in &listing.relationships {
            lines.push(Line::from(vec![
                Span::raw("• "),
                Span::styled(relationship.name, bold),
                Span::raw(format!(": {}", relationship.description)),
            ]));
        }
    }

    let schema = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Database Schema")
            .border_style(focus_style(focused)),
    );
    frame.render_widget(schema, area);
}

fn render_footer(frame: &mut Frame<'_>, app: &TuiApp, area: Rect) {
    let footer = Paragraph::new(vec![Line::from(format!(
        "Backend: {} | Focus: {} | Tab: switch  Enter: activate  PgUp/PgDn: scroll  F1: help  Esc: quit",
        app.backend_url,
        app.focus.label()
    ))])
    .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(footer, area);
}

fn render_help_popup(frame: &mut Frame<'_>) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("Keymap"),
        Line::from("Esc / Ctrl+C: quit"),
        Line::from("F1: toggle help"),
        Line::from("Tab / Shift+Tab: cycle focus"),
        Line::from("Enter: submit, pick example, or load schema (by focus)"),
        Line::from("Up / Down or 1..7: choose example"),
        Line::from("Backspace / Ctrl+U: delete char / clear question"),
        Line::from("PgUp / PgDn: scroll result rows"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(help, area);
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100_u16 - height_percent) / 2),
            Constraint::Percentage(height_percent),
            Constraint::Percentage((100_u16 - height_percent) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100_u16 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100_u16 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Keyword => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TokenKind::Label => Style::default().fg(Color::Yellow),
        TokenKind::RelationshipType => Style::default().fg(Color::Cyan),
        TokenKind::String => Style::default().fg(Color::Green),
        TokenKind::Number => Style::default().fg(Color::LightRed),
        TokenKind::Parameter => Style::default().fg(Color::LightBlue),
        TokenKind::Property => Style::default().fg(Color::Blue),
        TokenKind::Comment => Style::default().fg(Color::DarkGray),
        TokenKind::Punctuation => Style::default().fg(Color::Gray),
        TokenKind::Identifier | TokenKind::Whitespace => Style::default(),
    }
}

/// Splits highlighted tokens into terminal lines, breaking multi-line tokens.
pub(crate) fn cypher_lines<'a>(tokens: &[CypherToken<'a>]) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'a>> = Vec::new();

    for token in tokens {
        let style = token_style(token.kind);
        let mut pieces = token.text.split('\n');
        if let Some(first) = pieces.next() {
            if !first.is_empty() {
                current.push(Span::styled(first, style));
            }
        }
        for piece in pieces {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !piece.is_empty() {
                current.push(Span::styled(piece, style));
            }
        }
    }

    lines.push(Line::from(current));
    lines
}

fn visible_tail(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    text.char_indices()
        .nth(skip)
        .map_or("", |(offset, _)| &text[offset..])
}
