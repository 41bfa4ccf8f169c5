use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use term_categorizer::{CategoryMatch, CategoryNode, Classifier, TaxonomySnapshot, Token};

pub struct App {
    pub snapshot: TaxonomySnapshot,
    pub classifier: Classifier,
    pub input: String,
    pub tokens: Vec<Token>,
    pub matches: Vec<CategoryMatch>,
    pub error: Option<String>,
    pub state: TableState,
    pub show_tree: bool,
}

impl App {
    pub fn new(snapshot: TaxonomySnapshot, classifier: Classifier) -> Self {
        Self {
            snapshot,
            classifier,
            input: String::new(),
            tokens: Vec::new(),
            matches: Vec::new(),
            error: None,
            state: TableState::default(),
            show_tree: true,
        }
    }

    pub fn classify(&mut self) {
        self.tokens = self.classifier.tokenize_for(&self.input, &self.snapshot);

        match self.classifier.classify(&self.input, &self.snapshot) {
            Ok(matches) => {
                self.matches = matches;
                self.error = None;
            }
            Err(e) => {
                self.matches.clear();
                self.error = Some(e.to_string());
            }
        }

        self.state.select(if self.matches.is_empty() { None } else { Some(0) });
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.tokens.clear();
        self.matches.clear();
        self.error = None;
        self.state.select(None);
    }

    pub fn selected_match(&self) -> Option<&CategoryMatch> {
        self.state.selected().and_then(|i| self.matches.get(i))
    }

    pub fn next(&mut self) {
        let len = self.matches.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.matches.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Indented outline of the taxonomy, root excluded.
    pub fn tree_lines(&self) -> Vec<TreeLine<'_>> {
        let mut lines = Vec::new();
        for child in self.snapshot.root().children() {
            push_outline(child, 0, &mut lines);
        }
        lines
    }
}

/// One outline row; `name` is kept apart from the rendered text so the
/// selected category is found by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine<'a> {
    pub name: &'a str,
    pub text: String,
}

impl TreeLine<'_> {
    pub fn is_selected(&self, selected: Option<&str>) -> bool {
        selected == Some(self.name)
    }
}

fn push_outline<'a>(node: &'a CategoryNode, depth: usize, lines: &mut Vec<TreeLine<'a>>) {
    lines.push(TreeLine {
        name: node.name(),
        text: format!("{}{} ({} triggers)", "  ".repeat(depth), node.name(), node.triggers().len()),
    });
    for child in node.children() {
        push_outline(child, depth + 1, lines);
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.classify(),
                KeyCode::Tab => app.show_tree = !app.show_tree,
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Delete => app.clear(),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(3), // Tokens
            Constraint::Min(0),    // Results (+ taxonomy)
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_input(f, chunks[0], app);
    render_tokens(f, chunks[1], app);

    if app.show_tree {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);

        render_results(f, content[0], app);
        render_tree(f, content[1], app);
    } else {
        render_results(f, chunks[2], app);
    }

    render_status_bar(f, chunks[3], app);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(Line::from(vec![
        Span::raw(app.input.as_str()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Text (Enter to classify) "));

    f.render_widget(input, area);
}

fn render_tokens(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for (i, token) in app.tokens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" · "));
        }
        spans.push(Span::styled(token.as_str(), Style::default().fg(Color::Cyan)));
    }

    let tokens = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(format!(" Tokens ({}) ", app.tokens.len())));

    f.render_widget(tokens, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Category", "Weight", "Matched"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.matches.iter().map(|m| {
        let terms = m
            .matched
            .iter()
            .map(|t| format!("{}×{}", t.value, t.weight))
            .collect::<Vec<_>>()
            .join(", ");

        Row::new(vec![
            Cell::from(m.name.clone()),
            Cell::from(m.total_weight.to_string()).style(Style::default().fg(Color::Green)),
            Cell::from(terms),
        ])
        .height(1)
    });

    let title = match &app.error {
        Some(e) => format!(" Results - error: {} ", e),
        None => format!(" Results ({}) ", app.matches.len()),
    };

    let table = Table::new(
        rows,
        [Constraint::Length(24), Constraint::Length(8), Constraint::Min(10)],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_tree(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.selected_match().map(|m| m.name.as_str());

    let lines: Vec<Line> = app
        .tree_lines()
        .into_iter()
        .map(|line| {
            if line.is_selected(selected) {
                Line::from(Span::styled(line.text, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(line.text)
            }
        })
        .collect();

    let tree = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Taxonomy v{} ", app.snapshot.version)),
    );

    f.render_widget(tree, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status = Line::from(vec![
        Span::styled(
            format!(" {} categories ", app.snapshot.category_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled(
            format!("case: {} ", app.classifier.case_mode().as_str()),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("| "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" classify  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" tree  "),
        Span::styled("Del", Style::default().fg(Color::Yellow)),
        Span::raw(" clear  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);

    let bar = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use term_categorizer::{CaseMode, CategoryNode};

    fn app() -> App {
        let root = CategoryNode::new("Root")
            .with_child(CategoryNode::new("Funds").with_child(CategoryNode::new("Index").with_details("vfinx")))
            .with_child(CategoryNode::new("Bonds").with_details("vbmfx"));
        App::new(TaxonomySnapshot::new(&root, CaseMode::Sensitive, "test"), Classifier::default())
    }

    #[test]
    fn test_classify_updates_tokens_and_selection() {
        let mut app = app();
        app.input = "vbmfx and vfinx".to_string();
        app.classify();

        assert_eq!(app.tokens, vec!["vbmfx", "vfinx"]);
        assert_eq!(app.matches.len(), 2);
        assert_eq!(app.selected_match().map(|m| m.name.as_str()), Some("Bonds"));

        app.next();
        assert_eq!(app.selected_match().map(|m| m.name.as_str()), Some("Index"));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut app = app();
        app.input = "vfinx".to_string();
        app.classify();
        app.clear();

        assert!(app.input.is_empty());
        assert!(app.matches.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_tree_lines_skip_root() {
        let app = app();
        let lines: Vec<String> = app.tree_lines().into_iter().map(|l| l.text).collect();
        assert_eq!(
            lines,
            vec!["Funds (0 triggers)", "  Index (1 triggers)", "Bonds (1 triggers)"]
        );
    }

    #[test]
    fn test_tree_highlights_only_exact_name() {
        let root = CategoryNode::new("Root")
            .with_child(CategoryNode::new("Index").with_details("vfinx"))
            .with_child(CategoryNode::new("Index Funds").with_details("veurx"));
        let mut app = App::new(TaxonomySnapshot::new(&root, CaseMode::Sensitive, "test"), Classifier::default());
        app.input = "vfinx".to_string();
        app.classify();

        let selected = app.selected_match().map(|m| m.name.as_str());
        assert_eq!(selected, Some("Index"));

        let highlighted: Vec<&str> = app
            .tree_lines()
            .iter()
            .filter(|l| l.is_selected(selected))
            .map(|l| l.name)
            .collect();
        assert_eq!(highlighted, vec!["Index"]);
    }

    #[test]
    fn test_tokens_follow_snapshot_case_mode() {
        let root = CategoryNode::new("Root").with_child(CategoryNode::new("Index").with_details("vfinx"));
        let mut app = App::new(
            TaxonomySnapshot::new(&root, CaseMode::Insensitive, "test"),
            Classifier::new(CaseMode::Sensitive),
        );
        app.input = "VFINX".to_string();
        app.classify();

        assert_eq!(app.tokens, vec!["vfinx"]);
        assert_eq!(app.matches[0].matched[0].value, "vfinx");
    }
}
