//! Save and load popups

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use drumgrid::store::PatternSummary;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

pub fn render_name_prompt(frame: &mut Frame, area: Rect, name: &str) {
    let popup = centered(area, 40, 3);
    let input = Paragraph::new(format!("{}_", name))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Save as (Enter/Esc) ")
                .borders(Borders::ALL),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(input, popup);
}

pub fn render_load_list(frame: &mut Frame, area: Rect, entries: &[PatternSummary], selected: usize) {
    let height = (entries.len() as u16).saturating_add(2).min(area.height);
    let popup = centered(area, 40, height);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(entry.to_string()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Load pattern (Enter/Esc) ")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}
