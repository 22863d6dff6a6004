//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering never mutates anything
//! except the list selection state ratatui needs for scrolling.
//!
//! ## For contributors
//!
//! * Every screen is a main area plus a one-line status bar at the bottom.
//! * The product list adds a one-line filter bar on top.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::feed::ViewFilter;
use crate::form::Form;
use crate::nav::{DetailsParams, Screen};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match app.nav.current().clone() {
        Screen::Login => draw_form(&app.login_form, " Login ", frame, main_area),
        Screen::Register => draw_form(&app.register_form, " Register ", frame, main_area),
        Screen::AddProduct => draw_form(&app.product_form, " Add product ", frame, main_area),
        Screen::Profile => draw_form(&app.profile_form, " Profile ", frame, main_area),
        Screen::Home => draw_home(app, frame, main_area),
        Screen::ProductList => draw_product_list(app, frame, main_area),
        Screen::ProductDetails(params) => draw_details(app, &params, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

/// Key hints for a screen.
pub fn help(screen: &Screen) -> &'static str {
    match screen {
        Screen::Login => "Tab: next field  Enter: log in  Ctrl-R: register  Esc: quit",
        Screen::Register | Screen::AddProduct | Screen::Profile => {
            "Tab: next field  Enter: save  Esc: back"
        }
        Screen::Home => "p: products  a: add product  u: profile  n: notify  l: log out  q: quit",
        Screen::ProductList => "↑/↓: scroll  1/2/3: filter  f: favorite  Enter: details  Esc: back",
        Screen::ProductDetails(_) => "f: favorite  Esc: back",
    }
}

fn draw_form(form: &Form, title: &str, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical(form.fields.iter().map(|_| Constraint::Length(3))).split(inner);
    for (i, (field, row)) in form.fields.iter().zip(rows.iter()).enumerate() {
        let focused = i == form.focus;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut text = field.display();
        if focused {
            text.push('▏');
        }
        let input = Paragraph::new(text).block(
            Block::default()
                .title(field.label)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(input, *row);
    }
}

fn draw_home(app: &App, frame: &mut Frame, area: Rect) {
    let name = app.session.as_ref().map_or("guest", |u| u.name.as_str());
    let lines = vec![
        Line::from(Span::styled(
            format!("Welcome, {name}!"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("[p] Browse products"),
        Line::raw("[a] Add a product"),
        Line::raw("[n] Test notification"),
        Line::raw("[u] Profile"),
        Line::raw("[l] Log out"),
    ];
    let home = Paragraph::new(lines).block(Block::default().title(" Home ").borders(Borders::ALL));
    frame.render_widget(home, area);
}

fn draw_product_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let [filter_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    let Some(feed) = app.feed.as_ref() else {
        return;
    };
    let active = feed.filter();

    let tabs: Vec<Span> = ViewFilter::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, f)| {
            let style = if *f == active {
                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} {} ", i + 1, f.label()), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), filter_area);

    let mut list_items: Vec<ListItem> = feed
        .visible()
        .into_iter()
        .map(|product| {
            let heart = if feed.is_favorite(&product.id) {
                Span::styled("♥ ", Style::default().fg(Color::Red))
            } else {
                Span::styled("♡ ", Style::default().fg(Color::DarkGray))
            };

            let mut lines = vec![Line::from(vec![
                heart,
                Span::styled(product.name.clone(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(product.price.clone(), Style::default().fg(Color::Green)),
            ])];
            if let Some(description) = &product.description {
                lines.push(Line::from(Span::styled(
                    format!("  {description}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    if active == ViewFilter::All && feed.is_loading() {
        list_items.push(ListItem::new(Line::from(Span::styled(
            "  Loading…",
            Style::default().fg(Color::Yellow),
        ))));
    }

    let title = format!(" Products ({}) ", active.label());
    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, list_area, &mut app.list_state);
}

fn draw_details(app: &App, params: &DetailsParams, frame: &mut Frame, area: Rect) {
    let favorite = if app.is_favorite(&params.id) { "♥ favorite" } else { "♡" };
    let lines = vec![
        Line::from(Span::styled(
            params.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(params.price.clone(), Style::default().fg(Color::Green))),
        Line::from(Span::styled(favorite, Style::default().fg(Color::Red))),
        Line::raw(""),
        Line::from(vec![Span::raw("Image: "), Span::styled(params.image.clone(), Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw("Product ID: "), Span::styled(params.id.clone(), Style::default().fg(Color::DarkGray))]),
        Line::raw(""),
        Line::raw("A quality product, ideal for anyone looking for value and convenience. Get yours now!"),
    ];
    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Product details ").borders(Borders::ALL));
    frame.render_widget(details, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
    ];
    if let Some(feed) = app.feed.as_ref().filter(|_| app.nav.current() == &Screen::ProductList) {
        spans.push(Span::styled(
            format!("{} items", feed.visible_len()),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(help(app.nav.current())));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::Harness;
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn login_screen_renders_fields() {
        let mut h = Harness::new(MemoryStore::new());
        let text = render(&mut h.app);
        assert!(text.contains("E-mail"));
        assert!(text.contains("Password"));
    }

    #[test]
    fn password_is_masked() {
        let mut h = Harness::new(MemoryStore::new());
        h.app.login_form.set_value(1, "hunter2");
        let text = render(&mut h.app);
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn product_list_shows_loading_footer_then_items() {
        let mut h = Harness::logged_in();
        h.app.open_product_list();
        assert!(render(&mut h.app).contains("Loading"));

        h.pump();
        let first = h.app.visible_products()[0].name.clone();
        let text = render(&mut h.app);
        assert!(text.contains(&first));
        assert!(text.contains("20 items"), "status bar should show item count");
    }

    #[test]
    fn every_screen_draws_without_panicking() {
        let mut h = Harness::logged_in();
        render(&mut h.app);
        h.app.open_profile();
        render(&mut h.app);
        h.app.back();
        h.app.open_add_product();
        render(&mut h.app);
        h.app.back();
        h.app.open_product_list();
        h.pump();
        h.app.select_first();
        h.app.open_details();
        let text = render(&mut h.app);
        assert!(text.contains("Product ID"));
    }
}
