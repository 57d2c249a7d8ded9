//! Dashboard layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::runtime::App;
use super::style;

/// Minimum canvas span in degrees, so a single node still gets an area.
const MIN_SPAN_DEG: f64 = 0.01;

/// Renders the full dashboard frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // map + node list
            Constraint::Length(5), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_map(frame, app, body[0]);
    render_node_list(frame, app, body[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

/// Header bar: node/line counts and simulator state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, label) = if app.simulator.is_analyzing() {
        ("▶", "ANALYZING")
    } else if app.simulator.failed_nodes().is_empty() {
        ("■", "IDLE")
    } else {
        ("!", "CASCADE")
    };

    let header = Line::from(vec![
        Span::styled(
            " GRIDMIND ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ {} nodes │ {} lines │ {} overloaded │ {icon} {label} ",
            app.topology.nodes().len(),
            app.topology.lines().len(),
            app.topology.overloaded_line_count(),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Lines and nodes drawn at their coordinates.
fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Grid Map ").borders(Borders::ALL);
    let Some(b) = app.bounds else {
        frame.render_widget(Paragraph::new("  No nodes").block(block), area);
        return;
    };
    let x_bounds = widen(b.min_lng, b.max_lng);
    let y_bounds = widen(b.min_lat, b.max_lat);
    let radius = (x_bounds[1] - x_bounds[0]) * 0.012;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for r in app.topology.resolved_lines() {
                let failed = app.simulator.is_line_failed(&r.line.id);
                ctx.draw(&CanvasLine {
                    x1: r.from.position.lng,
                    y1: r.from.position.lat,
                    x2: r.to.position.lng,
                    y2: r.to.position.lat,
                    color: style::line_color(r.line.status, failed),
                });
            }
            ctx.layer();
            for (i, node) in app.topology.nodes().iter().enumerate() {
                let failed = app.simulator.is_node_failed(&node.id);
                let color = style::node_color(node.status, failed);
                ctx.draw(&Circle {
                    x: node.position.lng,
                    y: node.position.lat,
                    radius,
                    color,
                });
                if i == app.selected {
                    ctx.print(
                        node.position.lng,
                        node.position.lat,
                        Span::styled(
                            node.id.clone(),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn widen(lo: f64, hi: f64) -> [f64; 2] {
    if hi - lo < MIN_SPAN_DEG {
        let mid = (lo + hi) / 2.0;
        [mid - MIN_SPAN_DEG / 2.0, mid + MIN_SPAN_DEG / 2.0]
    } else {
        [lo, hi]
    }
}

/// Selectable node list with status markers.
fn render_node_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .topology
        .nodes()
        .iter()
        .map(|n| {
            let failed = app.simulator.is_node_failed(&n.id);
            let tag = if failed { "FAILED" } else { n.status.as_str() };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(style::node_color(n.status, failed))),
                Span::raw(format!("{:<12} {:>3} {tag}", n.id, n.health)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Nodes ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Selected node details and the last action message.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = match app.selected_node() {
        Some(n) => vec![
            Line::from(format!(
                "  {} ({})  {}  health={}  {:.0} kV  load={:.0}%  {:.0}°C",
                n.name, n.kind, n.status, n.health, n.voltage_kv, n.load_pct, n.temperature_c,
            )),
            Line::from(format!(
                "  connections: {}",
                if n.connections.is_empty() {
                    "(none)".to_string()
                } else {
                    n.connections.join(", ")
                }
            )),
        ],
        None => vec![Line::from("  No node selected")],
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", app.message),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ↑/↓:Select  c:Cascade  r:Reset",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
