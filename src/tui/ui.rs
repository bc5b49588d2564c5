//! Widget rendering
//!
//! Pure functions from panel state to ratatui widgets. Nothing here mutates
//! the app; every fallible decision was already made in the panels.

use super::{App, Tab};
use crate::api::types::ContentTypeTag;
use crate::panels::learning::ChartSlot;
use crate::panels::upload::{UploadPhase, UploadSource};
use crate::panels::{Banner, BannerKind};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Sparkline, Tabs, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_tabs(frame, vertical[0], app);

    match app.tab {
        Tab::Upload => render_upload(frame, vertical[1], app),
        Tab::Files => render_files(frame, vertical[1], app),
        Tab::Query => render_query(frame, vertical[1], app),
        Tab::Market => render_market(frame, vertical[1], app),
        Tab::Learning => render_learning(frame, vertical[1], app),
    }

    render_footer(frame, vertical[2], app);
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let titles = Tab::ALL.iter().map(|t| t.title());
    let note = app.backend_note.as_deref().unwrap_or("connecting...");
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" GoldMind Terminal - {} ", note)),
        );
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hotkeys = match app.tab {
        Tab::Upload => "Enter submit | Ctrl+Y file/YouTube | Left/Right type | Tab next panel",
        Tab::Files => {
            "Up/Down select | R refresh | D delete | S save locally | Tab next panel | Q quit"
        }
        Tab::Query => "Enter ask | Up/Down recall | Ctrl+A analytics | Ctrl+L clear history",
        Tab::Market => "R refresh | H history | P predict | T train | Tab next panel | Q quit",
        Tab::Learning => "R refresh | C concepts chart | T timeline chart | Q quit",
    };

    let banner = active_banner(app);
    let mut spans = vec![Span::raw(hotkeys)];
    if let Some(banner) = &banner {
        spans.push(Span::raw("  "));
        spans.push(banner_span(banner));
    }

    let footer =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn active_banner(app: &App) -> Option<Banner> {
    match app.tab {
        Tab::Upload => app.upload.banner(),
        Tab::Files => app.files.banner.clone(),
        Tab::Query => app.query.banner.clone(),
        Tab::Market => app.market.banner.clone(),
        Tab::Learning => app.learning.banner.clone(),
    }
}

fn banner_span(banner: &Banner) -> Span<'_> {
    let style = match banner.kind {
        BannerKind::Info => Style::default().fg(Color::Cyan),
        BannerKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    Span::styled(banner.text.as_str(), style)
}

fn render_upload(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let source_line = Line::from(vec![
        Span::raw("Source: "),
        source_span(app, UploadSource::File, "Local file"),
        Span::raw("  "),
        source_span(app, UploadSource::Youtube, "YouTube URL"),
    ]);
    frame.render_widget(
        Paragraph::new(source_line).block(Block::default().borders(Borders::ALL)),
        rows[0],
    );

    let file_active = app.upload.source == UploadSource::File;
    frame.render_widget(
        input_box("File path", &app.upload.path_input, file_active),
        rows[1],
    );
    frame.render_widget(
        input_box("YouTube URL", &app.upload.url_input, !file_active),
        rows[2],
    );

    let tag_line = if file_active {
        let mut tag_spans = vec![Span::raw("Content type: ")];
        for (i, tag) in ContentTypeTag::ALL.iter().enumerate() {
            if i > 0 {
                tag_spans.push(Span::raw(" | "));
            }
            let style = if *tag == app.upload.tag {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            tag_spans.push(Span::styled(tag.label(), style));
        }
        Line::from(tag_spans)
    } else {
        Line::from(vec![
            Span::raw("Content type: "),
            Span::styled(
                ContentTypeTag::Video.label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  (YouTube uploads are always video)",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    frame.render_widget(
        Paragraph::new(tag_line).block(Block::default().borders(Borders::ALL)),
        rows[3],
    );

    let status = match &app.upload.phase {
        UploadPhase::Idle => match app.upload.validation_hint() {
            Some(hint) => Line::from(Span::styled(
                format!("Ready when you are ({})", hint),
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::from(Span::styled(
                "Press Enter to upload",
                Style::default().fg(Color::Green),
            )),
        },
        UploadPhase::Uploading => Line::from(Span::styled(
            "Uploading...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        UploadPhase::Done { label, .. } => Line::from(Span::styled(
            format!("{} accepted, processing in background", label),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        UploadPhase::Error { message } => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    };
    frame.render_widget(
        Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Status")),
        rows[4],
    );
}

fn source_span<'a>(app: &App, source: UploadSource, label: &'a str) -> Span<'a> {
    if app.upload.source == source {
        Span::styled(
            format!("[{}]", label),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(format!(" {} ", label))
    }
}

fn input_box<'a>(title: &'a str, value: &'a str, active: bool) -> Paragraph<'a> {
    let border = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if active {
        format!("{}_", value)
    } else {
        value.to_string()
    };
    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    )
}

fn render_files(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let constraints = if app.files.pending_delete.is_some() {
        vec![Constraint::Min(4), Constraint::Length(3)]
    } else {
        vec![Constraint::Min(4)]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let items: Vec<ListItem<'_>> = app
        .files
        .files
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let marker = if idx == app.files.selected { ">" } else { " " };
            let state = if entry.processed {
                Span::styled("ready     ", Style::default().fg(Color::Green))
            } else {
                Span::styled("processing", Style::default().fg(Color::Yellow))
            };
            let modified = entry
                .modified()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {:<40}", marker, truncate(&entry.filename, 40))),
                state,
                Span::raw(format!("  {:>9}  {}", format_size(entry.size), modified)),
            ]))
        })
        .collect();

    let title = match app.files.last_refresh {
        Some(at) => format!(
            " Knowledge Files ({}, {} processing) refreshed {} ",
            app.files.files.len(),
            app.files.pending_count(),
            at.format("%H:%M:%S")
        ),
        None if app.files.loading => " Knowledge Files (loading...) ".to_string(),
        None => " Knowledge Files ".to_string(),
    };

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(
            "No files yet. Upload documents, charts or videos to build the knowledge base.",
        )])
    } else {
        List::new(items)
    };
    frame.render_widget(
        list.block(Block::default().borders(Borders::ALL).title(title)),
        rows[0],
    );

    if let Some(filename) = &app.files.pending_delete {
        let confirm = Paragraph::new(Line::from(Span::styled(
            format!("Delete {}? This also removes processed data. (y/n)", filename),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
        frame.render_widget(confirm, rows[1]);
    }
}

fn render_query(frame: &mut Frame<'_>, area: Rect, app: &App) {
    if app.query.show_analytics {
        render_analytics(frame, area, app);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(columns[0]);

    let input_title = if app.query.busy {
        "Question (thinking...)"
    } else {
        "Question"
    };
    frame.render_widget(
        input_box(input_title, &app.query.input, !app.query.busy),
        left[0],
    );

    let answer_text: Vec<Line<'_>> = match app.query.displayed() {
        Some(record) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Q: {}", record.question),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            for part in record.answer.lines() {
                lines.push(Line::from(part.to_string()));
            }
            if !record.sources.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Sources: {}", record.sources.join(", ")),
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("Asked {}", record.timestamp.format("%Y-%m-%d %H:%M")),
                Style::default().fg(Color::DarkGray),
            )));
            lines
        }
        None => vec![Line::from(
            "Ask anything about gold trading. Answers draw on the files you've uploaded.",
        )],
    };
    frame.render_widget(
        Paragraph::new(answer_text)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Answer")),
        left[1],
    );

    let items: Vec<ListItem<'_>> = app
        .query
        .records()
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let marker = if Some(idx) == app.query.selected {
                ">"
            } else {
                " "
            };
            ListItem::new(format!("{} {}", marker, truncate(&record.question, 34)))
        })
        .collect();
    let history_title = format!(" History ({}) ", app.query.records().len());
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(history_title)),
        columns[1],
    );
}

fn render_analytics(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(analytics) = &app.query.analytics else {
        frame.render_widget(
            Paragraph::new("Loading analytics...").block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Query Analytics (Esc to close) "),
            ),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let summary = format!(
        "Total queries: {}   Recent: {}   Topics tracked: {}",
        analytics.total_queries,
        analytics.recent_queries_count,
        analytics.top_topics.len()
    );
    frame.render_widget(
        Paragraph::new(summary).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Query Analytics (Esc to close) "),
        ),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let mut topics: Vec<(String, u64)> = analytics
        .top_topics
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let topic_items: Vec<ListItem<'_>> = topics
        .iter()
        .map(|(topic, count)| ListItem::new(format!("{:>4}  {}", count, topic)))
        .collect();
    frame.render_widget(
        List::new(topic_items).block(Block::default().borders(Borders::ALL).title("Top Topics")),
        columns[0],
    );

    let recent_items: Vec<ListItem<'_>> = analytics
        .recent_queries
        .iter()
        .map(|q| ListItem::new(truncate(&q.question, 48).to_string()))
        .collect();
    frame.render_widget(
        List::new(recent_items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recent Questions"),
        ),
        columns[1],
    );
}

fn render_market(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(4),
        ])
        .split(area);

    let live_title = if app.market.refresh_pending() {
        " Live Gold (refreshing...) "
    } else {
        " Live Gold "
    };

    match &app.market.snapshot {
        Some(snap) => {
            let change_style = if snap.quote.change >= 0.0 {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            };
            let sign = if snap.quote.change >= 0.0 { "+" } else { "" };
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} {:.2} USD  ", snap.quote.symbol, snap.quote.price),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(
                            "{}{:.2} ({}{:.2}%)",
                            sign, snap.quote.change, sign, snap.quote.change_percent
                        ),
                        change_style,
                    ),
                ]),
                Line::from(format!(
                    "O {:.2}  H {:.2}  L {:.2}  Vol {}",
                    snap.quote.open, snap.quote.high, snap.quote.low, snap.quote.volume
                )),
                Line::from(Span::styled(
                    format!("As of {}", snap.as_of.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title(live_title)),
                rows[0],
            );
        }
        None => {
            frame.render_widget(
                Paragraph::new("Waiting for the first market poll...")
                    .block(Block::default().borders(Borders::ALL).title(live_title)),
                rows[0],
            );
        }
    }

    let status_line = match app.market.snapshot.as_ref().map(|s| &s.status) {
        Some(status) => {
            let open = match status.market_open {
                Some(true) => Span::styled("market open", Style::default().fg(Color::Green)),
                Some(false) => Span::styled("market closed", Style::default().fg(Color::Red)),
                None => Span::styled("market hours unknown", Style::default().fg(Color::DarkGray)),
            };
            let mut spans = vec![open];
            if let Some(service) = &status.market_service {
                spans.push(Span::raw(format!("  service: {}", service)));
            }
            if let Some(engine) = &status.prediction_engine {
                spans.push(Span::raw(format!(
                    "  engine: {} ({} features)",
                    if engine.trained { "trained" } else { "untrained" },
                    engine.features_count
                )));
            }
            Line::from(spans)
        }
        None => Line::from("status pending"),
    };
    frame.render_widget(
        Paragraph::new(status_line).block(Block::default().borders(Borders::ALL).title("Status")),
        rows[1],
    );

    let closes = app.market.closes();
    let scaled = scale_sparkline(&closes);
    let spark_title = if closes.is_empty() {
        " Trend (press H to load history) ".to_string()
    } else {
        format!(" Trend ({} candles, 1mo/1h) ", closes.len())
    };
    frame.render_widget(
        Sparkline::default()
            .data(&scaled)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(spark_title)),
        rows[2],
    );

    let prediction_items: Vec<ListItem<'_>> = app
        .market
        .predictions
        .iter()
        .map(|p| {
            ListItem::new(format!(
                "{}  close {:.2}  (confidence {:.0}%)",
                p.timestamp,
                p.close,
                p.confidence * 100.0
            ))
        })
        .collect();
    let predictions_title = match app.market.model_trained {
        Some(true) => " Predictions (model trained) ",
        Some(false) => " Predictions (model untrained, T to train) ",
        None => " Predictions (press P) ",
    };
    let list = if prediction_items.is_empty() {
        List::new(vec![ListItem::new(
            "No forecast yet. P fetches the next candles; T trains the model first.",
        )])
    } else {
        List::new(prediction_items)
    };
    frame.render_widget(
        list.block(
            Block::default()
                .borders(Borders::ALL)
                .title(predictions_title),
        ),
        rows[3],
    );
}

fn render_learning(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(stats) = &app.learning.stats else {
        let text = if app.learning.loading {
            "Loading learning summary..."
        } else {
            "Learning summary unavailable. Press R to retry."
        };
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Learning Summary "),
            ),
            area,
        );
        return;
    };

    if app.learning.shows_empty_state() {
        let lines = vec![
            Line::from(Span::styled(
                "Nothing learned yet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Upload trading documents, chart images or course videos on the"),
            Line::from("Upload panel. Every processed file adds concepts, patterns and"),
            Line::from("indicators here."),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Learning Summary "),
                ),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(area);

    let summary = format!(
        "Files processed: {}   Concepts: {}   Patterns: {}   Indicators: {}",
        stats.total_files_processed,
        stats.concepts_by_frequency.len(),
        stats.patterns_by_frequency.len(),
        stats.indicators_by_frequency.len()
    );
    frame.render_widget(
        Paragraph::new(summary).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Learning Summary "),
        ),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let top = app.learning.top_concepts(8);
    let bars: Vec<(&str, u64)> = top.iter().map(|(name, n)| (name.as_str(), *n)).collect();
    frame.render_widget(
        BarChart::default()
            .data(&bars)
            .bar_width(9)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Yellow))
            .value_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title("Top Concepts")),
        columns[0],
    );

    let timeline_items: Vec<ListItem<'_>> = stats
        .learning_timeline
        .iter()
        .rev()
        .take(12)
        .map(|entry| {
            ListItem::new(format!(
                "{}  {}  [{}]",
                entry.date,
                truncate(&entry.file, 26),
                entry.content_type
            ))
        })
        .collect();
    frame.render_widget(
        List::new(timeline_items).block(Block::default().borders(Borders::ALL).title("Timeline")),
        columns[1],
    );

    let chart_lines = vec![
        chart_slot_line("Concepts chart (C)", &app.learning.concepts_chart),
        chart_slot_line("Timeline chart (T)", &app.learning.timeline_chart),
    ];
    frame.render_widget(
        Paragraph::new(chart_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Chart Images"),
        ),
        rows[2],
    );
}

fn chart_slot_line<'a>(label: &'a str, slot: &'a ChartSlot) -> Line<'a> {
    let (text, style) = match slot {
        ChartSlot::Empty => ("not fetched".to_string(), Style::default().fg(Color::DarkGray)),
        ChartSlot::Fetching => ("fetching...".to_string(), Style::default().fg(Color::Yellow)),
        ChartSlot::Saved(path) => (
            format!("saved to {}", path.display()),
            Style::default().fg(Color::Green),
        ),
        ChartSlot::Unavailable(reason) => (reason.clone(), Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        Span::raw(format!("{:<22} ", label)),
        Span::styled(text, style),
    ])
}

/// Min-max scale close prices into sparkline heights
fn scale_sparkline(values: &[f64]) -> Vec<u64> {
    let (min, max) = values.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    });
    if values.is_empty() || (max - min).abs() < f64::EPSILON {
        return values.iter().map(|_| 1).collect();
    }
    values
        .iter()
        .map(|v| (((v - min) / (max - min)) * 100.0).round() as u64)
        .collect()
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
