//! netscope - terminal overlay for inspecting captured HTTP/GraphQL traffic
//!
//! Architecture:
//! - Capture side - snapshot file import or a demo feed appending to the log
//! - App Layer - central state machine processing events
//! - UI Layer (Ratatui) - synchronous terminal rendering

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use netscope::constants::{APP_NAME, APP_VERSION};
use netscope::messages::render::{DetailContent, DetailRender};
use netscope::messages::ui_events::{key_to_ui_event, InputMode};
use netscope::models::{Headers, HttpMethod, NewExchange};
use netscope::ui::{filter_badge, key_value_lines, method_color, render_tabs, status_color};
use netscope::{AppActor, DetailTab, ExchangeLog, FileShareSink, InspectorConfig, RenderState, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = InspectorConfig::load();

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Capture side: a shared snapshot file, or a small live demo feed
    let log = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ExchangeLog::load_snapshots(&path)?,
        None => {
            let log = ExchangeLog::new();
            tokio::spawn(demo_capture(log.clone()));
            log
        }
    };
    tracing::info!(version = APP_VERSION, exchanges = log.len(), "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn app actor
    let share_sink = Box::new(FileShareSink::new("netscope-share.txt"));
    let app_actor = AppActor::new(log, config, render_tx, share_sink);
    tokio::spawn(app_actor.run(ui_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Simulated capture collaborator: records calls and completes them over time
async fn demo_capture(log: ExchangeLog) {
    let calls: [(HttpMethod, &str, &str, Option<&str>, i32, &str, u64); 5] = [
        (HttpMethod::GET, "https://api.example.com/users?ids=[1,2,3]&active=true", "", None, 200,
         r#"{"users":[{"id":1,"name":"Ada"},{"id":2,"name":"Linus"},{"id":3,"name":"Grace"}]}"#, 120),
        (HttpMethod::POST, "https://api.example.com/graphql", r#"{"query":"query Me {\n  me { id name }\n}","variables":{"verbose":true},"operationName":"Me"}"#,
         Some("Me"), 200, r#"{"data":{"me":{"id":"7","name":"Ada"}}}"#, 340),
        (HttpMethod::DELETE, "https://api.example.com/users/99", "", None, 404, "Not Found", 45),
        (HttpMethod::PUT, "https://api.example.com/users/1", r#"{"name":"Ada Lovelace"}"#, None, 500,
         "<html><body>Internal Server Error</body></html>", 1850),
        (HttpMethod::GET, "https://cdn.example.com/large.json", "", None, -1, "", 0),
    ];

    let mut pending = Vec::new();
    for (method, url, body, gql, status, response, duration) in calls {
        let mut new = NewExchange::new(method, url);
        new.start_time = chrono::Utc::now().timestamp_millis();
        new.request_headers = Headers::from_iter([("Accept", "application/json"), ("User-Agent", APP_NAME)]);
        new.request_body = body.to_string();
        new.gql_operation = gql.map(str::to_string);
        let mut handle = log.record(new);

        tokio::time::sleep(Duration::from_millis(400)).await;
        if status < 0 {
            // Left pending so the loading state stays visible
            pending.push(handle);
            continue;
        }
        handle.response_headers(Headers::from_iter([("Content-Type", "application/json")]));
        handle.complete(status, duration);
        tokio::time::sleep(Duration::from_millis(duration.min(800))).await;
        handle.deliver_body(response);
    }

    // Dropping a handle fails its body; keep the pending ones open
    std::future::pending::<()>().await;
    drop(pending);
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search + filter
            Constraint::Min(0),    // List or detail
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(f, state, main_chunks[0]);

    match &state.detail {
        Some(detail) => draw_detail(f, detail, state.detail_scroll, main_chunks[1]),
        None => draw_list(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if let Some(detail) = state.detail.as_ref().filter(|d| d.url_modal_open) {
        draw_url_modal(f, &detail.url, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_search_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let editing = state.input_mode == InputMode::Searching;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut title = vec![Span::raw(format!(" {} ", APP_NAME))];
    if state.filter_active {
        title.push(Span::styled(
            format!("[filter: {}] ", filter_badge(&state.filter)),
            Style::default().fg(Color::Green).bold(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title))
        .title_bottom(Line::from(format!(" {}/{} ", state.rows.len(), state.total)).right_aligned());

    let text = if state.search.is_empty() && !editing {
        Span::styled("Press '/' to search", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.search.as_str())
    };
    f.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.search.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let top = Line::from(Span::styled(row.top_line.clone(), Style::default().fg(Color::DarkGray)));
            let main = Line::from(vec![
                Span::styled(
                    format!("{} : ", row.method),
                    Style::default().fg(method_color(row.method)).bold(),
                ),
                Span::styled(row.url.clone(), Style::default().fg(status_color(row.status_class))),
            ]);
            ListItem::new(vec![top, main])
        })
        .collect();

    if items.is_empty() {
        let message = if state.total == 0 {
            "No requests captured yet."
        } else {
            "No requests match the current search and filter. Press 'c' to clear the filter."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Requests "));
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Requests "))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(f: &mut Frame, detail: &DetailRender, scroll: u16, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Content
        ])
        .split(area);

    let summary = &detail.summary;
    let header = Paragraph::new(vec![
        Line::from(Span::styled(summary.top_line.clone(), Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled(format!("{} : ", summary.method), Style::default().fg(method_color(summary.method)).bold()),
            Span::styled(detail.url.clone(), Style::default().fg(status_color(summary.status_class))),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title(" u:URL  c:cURL  f:full request  y:share section "));
    f.render_widget(header, chunks[0]);

    let titles: Vec<&str> = DetailTab::ALL.iter().map(DetailTab::title).collect();
    f.render_widget(render_tabs(&titles, detail.tab.index()), chunks[1]);

    let lines = match &detail.content {
        DetailContent::Response { body_segments } => {
            let mut lines = vec![section_title("Response Body")];
            lines.extend(segment_lines(body_segments));
            lines
        }
        DetailContent::Request { body_segments, query_params } => {
            let mut lines = vec![section_title("Request Body")];
            lines.extend(segment_lines(body_segments));
            lines.push(Line::default());
            lines.push(section_title("Request Query Params"));
            lines.extend(key_value_lines(query_params));
            lines
        }
        DetailContent::Headers { request, response } => header_sections(request, response),
    };

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(content, chunks[2]);
}

fn header_sections(request: &Headers, response: &Headers) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("Request Headers")];
    lines.extend(key_value_lines(request));
    lines.push(Line::default());
    lines.push(section_title("Response Headers"));
    lines.extend(key_value_lines(response));
    lines
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), Style::default().fg(Color::Cyan).bold()))
}

/// Segments become spans; a line may continue across a segment boundary
fn segment_lines(segments: &[String]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];
    for segment in segments {
        for (i, piece) in segment.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if let Some(line) = lines.last_mut().filter(|_| !piece.is_empty()) {
                line.push_span(Span::raw(piece.to_string()));
            }
        }
    }
    lines
}

fn draw_url_modal(f: &mut Frame, url: &str, area: Rect) {
    let popup_area = centered_rect(80, 30, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" URL (Esc to close) ")
        .style(Style::default().bg(Color::Black));
    let text = Paragraph::new(url.to_string()).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.input_mode == InputMode::Searching {
        " Type to search | Enter/Esc: done "
    } else if state.detail.is_some() {
        " 1-3/Tab:tabs | ↑/↓:scroll | u:URL | c/f/y:share | Esc:back | ?:help "
    } else {
        " /:search | g/p/u/a/d/h:method | e:errors | s:status | c:clear | Enter:open | ?:help | q:quit "
    };

    let line = match &state.status_message {
        Some(message) => Line::from(vec![
            Span::styled(format!(" {} ", message), Style::default().fg(Color::Green)),
            Span::styled(hints, Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 NETSCOPE - Keyboard Shortcuts

 REQUEST LIST
   ↑ / ↓              Select request
   Enter              Open request details
   /                  Search URL / GraphQL operation

 FILTER
   g p u a d h        Toggle GET POST PUT PATCH DELETE HEAD
   e                  Errors only
   s                  Only the selected request's status
   c                  Clear filter

 REQUEST DETAILS
   1 / 2 / 3 / Tab    Response / Request / Headers
   u                  Show full URL
   c                  Share as cURL
   f                  Share full request (JSON)
   y                  Share current section
   Esc                Back to list

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
