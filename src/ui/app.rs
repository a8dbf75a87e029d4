use std::mem;

use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{debug, error, info, warn};

use crate::db::{CustomerStore, StoreError};
use crate::models::{Column, CustomerFields};
use crate::table::{CustomerTable, TableView};

use super::forms::{Alert, ConfirmCustomerDelete, CustomerForm, FormField};
use super::helpers::{centered_rect, centered_rows, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Fine-grained modes of the main screen. Every mode except `Normal` is a
/// modal popup that swallows input until it closes.
enum Mode {
    Normal,
    Adding(CustomerForm),
    Editing { id: i64, form: CustomerForm },
    ConfirmDelete(ConfirmCustomerDelete),
    Filtering(FilterState),
    Alert(Alert),
}

/// State for an active inline filter.
struct FilterState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the store handle; every mutation goes
/// through it and is followed by a full reload of the table.
pub struct App {
    store: Box<dyn CustomerStore>,
    table: CustomerTable,
    view: TableView,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Take ownership of the store and load the first snapshot.
    pub fn new(store: Box<dyn CustomerStore>) -> Self {
        let table = CustomerTable::empty();
        let view = TableView::new(&table);
        let mut app = Self {
            store,
            table,
            view,
            mode: Mode::Normal,
            status: None,
        };
        app.load();
        app
    }

    /// Fetch every customer. A disconnected store falls back to the sample
    /// rows so the screen is never empty; a failing query raises an alert.
    pub fn load(&mut self) {
        if let Err(err) = self.reload(None) {
            self.mode = Mode::Alert(load_failed(&err));
        }
    }

    pub fn table(&self) -> &CustomerTable {
        &self.table
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Whether no popup is open.
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Normal)
    }

    /// Message of the open alert, if one is showing.
    pub fn alert(&self) -> Option<&str> {
        match &self.mode {
            Mode::Alert(alert) => Some(alert.message.as_str()),
            _ => None,
        }
    }

    /// Release the store. Called once the event loop is done.
    pub fn shutdown(&mut self) {
        self.store.disconnect();
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { id, form } => self.handle_edit(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Filtering(state) => self.handle_filter(code, state),
            Mode::Alert(alert) => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
                _ => Mode::Alert(alert),
            },
        };

        exit
    }

    /// Open the editor in create mode.
    pub fn add(&mut self) {
        if self.is_idle() {
            self.mode = self.begin_add();
        }
    }

    /// Open the editor on the selected customer.
    pub fn edit(&mut self) {
        if self.is_idle() {
            self.mode = self.begin_edit();
        }
    }

    /// Ask to delete the selected customer.
    pub fn delete(&mut self) {
        if self.is_idle() {
            self.mode = self.begin_delete();
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.view.move_selection(-1),
            KeyCode::Down => self.view.move_selection(1),
            KeyCode::PageUp => self.view.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.view.move_selection(PAGE_STEP),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                return self.begin_add();
            }
            KeyCode::Char('e') | KeyCode::Char('E') => return self.begin_edit(),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') | KeyCode::Delete => {
                return self.begin_delete();
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                let query = self.view.filter().unwrap_or_default().to_string();
                return Mode::Filtering(FilterState { query });
            }
            KeyCode::Char('s') => self.view.cycle_sort(&self.table, true),
            KeyCode::Char('S') => self.view.cycle_sort(&self.table, false),
            KeyCode::Char('o') | KeyCode::Char('O') => self.view.reverse_sort(&self.table),
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => {
                self.clear_status();
                if let Err(err) = self.reload(None) {
                    return Mode::Alert(load_failed(&err));
                }
                if !self.table.is_placeholder() {
                    self.set_status(
                        format!("Loaded {} customers.", self.table.len()),
                        StatusKind::Info,
                    );
                }
            }
            KeyCode::Enter => self.open_selected_email(),
            _ => {}
        }
        Mode::Normal
    }

    fn begin_add(&mut self) -> Mode {
        self.clear_status();
        Mode::Adding(CustomerForm::blank())
    }

    fn begin_edit(&mut self) -> Mode {
        match self.view.selected_customer(&self.table) {
            Some(customer) => {
                debug!(target: "ui", id = customer.id, "editing customer");
                let id = customer.id;
                let form = CustomerForm::from_customer(customer);
                self.clear_status();
                Mode::Editing { id, form }
            }
            None => Mode::Alert(Alert::warning("Please select a customer to edit.")),
        }
    }

    fn begin_delete(&mut self) -> Mode {
        match self.view.selected_customer(&self.table) {
            Some(customer) => {
                let confirm = ConfirmCustomerDelete::from(customer);
                self.clear_status();
                Mode::ConfirmDelete(confirm)
            }
            None => Mode::Alert(Alert::warning("Please select a customer to delete.")),
        }
    }

    fn handle_add(&mut self, code: KeyCode, mut form: CustomerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => self.save_new_customer(form.to_fields()),
            code => {
                edit_form(&mut form, code);
                Mode::Adding(form)
            }
        }
    }

    fn handle_edit(&mut self, code: KeyCode, id: i64, mut form: CustomerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => self.save_existing_customer(id, form.to_fields()),
            code => {
                edit_form(&mut form, code);
                Mode::Editing { id, form }
            }
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmCustomerDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.perform_delete(&confirm),
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_filter(&mut self, code: KeyCode, mut state: FilterState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.view.set_filter(&self.table, None);
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.view.move_selection(-1);
                return Mode::Filtering(state);
            }
            KeyCode::Down => {
                self.view.move_selection(1);
                return Mode::Filtering(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Filtering(state),
        }

        self.view.set_filter(&self.table, Some(state.query.clone()));
        Mode::Filtering(state)
    }

    fn save_new_customer(&mut self, fields: CustomerFields) -> Mode {
        match self.store.insert(&fields) {
            Ok(id) => {
                info!(target: "ui", id, "added customer");
                self.after_mutation(Some(id), format!("Added {}.", display_name(&fields)))
            }
            Err(err) => self.mutation_failed("Failed to add customer.", &err),
        }
    }

    fn save_existing_customer(&mut self, id: i64, fields: CustomerFields) -> Mode {
        match self.store.update(id, &fields) {
            Ok(()) => {
                info!(target: "ui", id, "updated customer");
                self.after_mutation(Some(id), format!("Updated {}.", display_name(&fields)))
            }
            Err(err) => self.mutation_failed("Failed to update customer.", &err),
        }
    }

    fn perform_delete(&mut self, confirm: &ConfirmCustomerDelete) -> Mode {
        match self.store.delete(confirm.id) {
            Ok(()) => {
                info!(target: "ui", id = confirm.id, "deleted customer");
                self.after_mutation(None, format!("Deleted '{}'.", confirm.company_name))
            }
            Err(err) => self.mutation_failed("Failed to delete customer.", &err),
        }
    }

    /// Discard the table and rebuild it from the store.
    fn after_mutation(&mut self, focus: Option<i64>, message: String) -> Mode {
        match self.reload(focus) {
            Ok(()) => {
                self.set_status(message, StatusKind::Info);
                Mode::Normal
            }
            Err(err) => Mode::Alert(load_failed(&err)),
        }
    }

    /// Leave the table exactly as it was and tell the user.
    fn mutation_failed(&mut self, message: &str, err: &StoreError) -> Mode {
        error!(target: "ui", error = %err, "{message}");
        let detail = surface_error(err);
        self.set_status(format!("{message} {detail}"), StatusKind::Error);
        Mode::Alert(Alert::error(message, detail))
    }

    fn reload(&mut self, focus: Option<i64>) -> Result<(), StoreError> {
        let keep = focus.or_else(|| self.view.selected_customer(&self.table).map(|c| c.id));

        if !self.store.is_connected() {
            warn!(target: "ui", "store disconnected, showing sample data");
            self.table = CustomerTable::samples();
            self.view.refresh(&self.table, keep);
            self.set_status(
                "Not connected to the database: showing sample data. Changes are not saved.",
                StatusKind::Error,
            );
            return Ok(());
        }

        match self.store.list() {
            Ok(rows) => {
                self.table = CustomerTable::from_store(rows);
                self.view.refresh(&self.table, keep);
                Ok(())
            }
            Err(err) => {
                error!(target: "ui", error = %err, "failed to load customers");
                self.table = CustomerTable::empty();
                self.view.refresh(&self.table, None);
                Err(err)
            }
        }
    }

    fn open_selected_email(&mut self) {
        let Some(customer) = self.view.selected_customer(&self.table) else {
            return;
        };
        let email = customer.fields.email.trim().to_string();
        let name = customer.to_string();

        if email.is_empty() {
            self.set_status("This customer has no email address.", StatusKind::Error);
        } else if let Err(err) = open_link(format!("mailto:{email}")) {
            self.set_status(format!("Failed to open email: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened email to {name}."), StatusKind::Info);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Adding(form) => self.draw_form(frame, area, "Add Customer", form),
            Mode::Editing { form, .. } => self.draw_form(frame, area, "Edit Customer", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Filtering(state) => self.draw_filter_bar(frame, area, state),
            Mode::Alert(alert) => self.draw_alert(frame, area, alert),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.table_title());

        if self.table.is_empty() {
            let message = Paragraph::new("No customers yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let sort = self.view.sort();
        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(Column::ALL.iter().map(|column| {
            let label = match sort {
                Some((sorted, order)) if sorted == *column => {
                    format!("{} {}", column.header(), order.arrow())
                }
                _ => column.header().to_string(),
            };
            Cell::from(label)
        }))
        .style(header_style);

        let rows = self.view.visible_rows(&self.table).map(|customer| {
            let row = Row::new(Column::ALL.iter().map(|column| column.display(customer)));
            if customer.fields.is_active {
                row
            } else {
                row.style(Style::default().fg(Color::DarkGray))
            }
        });

        let widths = Column::ALL.iter().map(|column| column_width(*column));
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::REVERSED),
            );

        let mut state = TableState::default().with_selected(self.view.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn table_title(&self) -> Line<'static> {
        let mut spans = Vec::new();
        if self.table.is_placeholder() {
            spans.push(Span::styled(
                " SAMPLE DATA - not connected, nothing is saved ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let mut text = format!(
            " Customers ({} of {}) ",
            self.view.len(),
            self.table.len()
        );
        if let Some((column, order)) = self.view.sort() {
            text.push_str(&format!("• sorted by {} {} ", column.header(), order.arrow()));
        }
        if let Some(filter) = self.view.filter() {
            text.push_str(&format!("• filter '{filter}' "));
        }
        spans.push(Span::raw(text));
        Line::from(spans)
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::Adding(_) | Mode::Editing { .. } => &[
                ("[Tab/↑↓]", " Field   "),
                ("[Space]", " Toggle Active   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n/Esc]", " Keep")],
            Mode::Filtering(_) => &[
                ("[type]", " Filter   "),
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Keep   "),
                ("[Esc]", " Clear"),
            ],
            Mode::Alert(_) => &[("[Enter/Esc]", " Dismiss")],
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[a]", " Add   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[f]", " Filter   "),
                ("[s/S]", " Sort   "),
                ("[o]", " Order   "),
                ("[r]", " Reload   "),
                ("[Enter]", " Email   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &CustomerForm) {
        let height = FormField::ALL.len() as u16 + 4;
        let popup_area = centered_rows(70, height, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to save • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active_row() as u16;
        if cursor_y < inner.y + inner.height {
            frame.set_cursor_position((cursor_x.min(inner.x + inner.width), cursor_y));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmCustomerDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Customer")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete '{}'?",
                confirm.company_name
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(alert.kind.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(alert.kind.color()));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(Span::styled(
            alert.message.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(detail) = &alert.detail {
            lines.push(Line::from(detail.clone()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter or Esc to dismiss.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect, state: &FilterState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Filter");
        let paragraph = Paragraph::new(Span::raw(format!("Filter: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Filter: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// Keys shared by the add and edit forms.
fn edit_form(form: &mut CustomerForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            form.push_char(ch);
        }
        _ => {}
    }
}

fn load_failed(err: &StoreError) -> Alert {
    Alert::error("Failed to load customers.", surface_error(err))
}

fn display_name(fields: &CustomerFields) -> String {
    if fields.company_name.trim().is_empty() {
        "customer".to_string()
    } else {
        format!("'{}'", fields.company_name)
    }
}

fn column_width(column: Column) -> Constraint {
    match column {
        Column::Id => Constraint::Length(5),
        Column::Coid => Constraint::Length(8),
        Column::CompanyName => Constraint::Min(14),
        Column::ShortName => Constraint::Length(10),
        Column::Contact => Constraint::Min(12),
        Column::Phone => Constraint::Length(14),
        Column::Email => Constraint::Min(16),
        Column::Address1 | Column::Address2 => Constraint::Min(12),
        Column::City | Column::State | Column::Country => Constraint::Length(10),
        Column::PostalCode => Constraint::Length(11),
        Column::Active => Constraint::Length(8),
        Column::Created | Column::Updated => Constraint::Length(19),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::SqliteStore;
    use crate::models::CustomerFields;
    use std::path::PathBuf;

    fn fields(coid: &str, company: &str) -> CustomerFields {
        CustomerFields {
            coid: coid.to_string(),
            company_name: company.to_string(),
            email: format!("{}@example.test", coid.to_lowercase()),
            is_active: true,
            ..CustomerFields::default()
        }
    }

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&fields("C1", "Zeta Ltd")).unwrap();
        store.insert(&fields("C2", "Alpha Inc")).unwrap();
        store.insert(&fields("C3", "Mid Co")).unwrap();
        store
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn company_of(app: &App, id: i64) -> Option<String> {
        let index = app.table().position_of(id)?;
        app.table()
            .row(index)
            .map(|c| c.fields.company_name.clone())
    }

    #[test]
    fn load_lists_store_rows() {
        let app = App::new(Box::new(seeded_store()));
        assert_eq!(app.table().len(), 3);
        assert!(!app.table().is_placeholder());
        assert!(app.is_idle());
    }

    #[test]
    fn disconnected_store_falls_back_to_samples() {
        let store = SqliteStore::new(
            PathBuf::from("/nonexistent/dir/customers.sqlite"),
            DatabaseConfig {
                create_schema: false,
                ..DatabaseConfig::default()
            },
        );
        let app = App::new(Box::new(store));
        assert!(app.table().is_placeholder());
        assert!(!app.table().is_empty());
        assert!(app.is_idle());
    }

    #[test]
    fn add_inserts_and_reloads() {
        let mut app = App::new(Box::new(SqliteStore::open_in_memory().unwrap()));
        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "C9");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Nine Ltd");
        app.handle_key(KeyCode::Enter);

        assert!(app.is_idle());
        assert_eq!(app.table().len(), 1);
        let customer = app.view().selected_customer(app.table()).unwrap();
        assert_eq!(customer.fields.coid, "C9");
        assert_eq!(customer.fields.company_name, "Nine Ltd");
        assert!(customer.fields.is_active);
    }

    #[test]
    fn cancelling_the_form_changes_nothing() {
        let mut app = App::new(Box::new(seeded_store()));
        app.add();
        type_text(&mut app, "ignored");
        app.handle_key(KeyCode::Esc);

        assert!(app.is_idle());
        assert_eq!(app.table().len(), 3);
    }

    #[test]
    fn edit_resolves_visible_row_through_sort() {
        let mut app = App::new(Box::new(seeded_store()));
        // None -> ID -> COID -> Company Name
        for _ in 0..3 {
            app.handle_key(KeyCode::Char('s'));
        }
        app.handle_key(KeyCode::Home);

        // Visible row 0 is "Alpha Inc" (id 2), stored second.
        app.edit();
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, " Group");
        app.handle_key(KeyCode::Enter);

        assert!(app.is_idle());
        assert_eq!(company_of(&app, 2).as_deref(), Some("Alpha Inc Group"));
        assert_eq!(company_of(&app, 1).as_deref(), Some("Zeta Ltd"));
    }

    #[test]
    fn edit_resolves_visible_row_through_filter() {
        let mut app = App::new(Box::new(seeded_store()));
        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "mid");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view().len(), 1);

        app.handle_key(KeyCode::Char('e'));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Backspace);
        type_text(&mut app, "Corp");
        app.handle_key(KeyCode::Enter);

        assert_eq!(company_of(&app, 3).as_deref(), Some("Mid Corp"));
    }

    #[test]
    fn edit_without_selection_warns() {
        let mut app = App::new(Box::new(SqliteStore::open_in_memory().unwrap()));
        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.alert(), Some("Please select a customer to edit."));
        app.handle_key(KeyCode::Enter);
        assert!(app.is_idle());

        app.handle_key(KeyCode::Char('d'));
        assert_eq!(app.alert(), Some("Please select a customer to delete."));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = App::new(Box::new(seeded_store()));
        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.table().len(), 3);

        app.handle_key(KeyCode::Home);
        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('y'));
        assert!(app.is_idle());
        assert_eq!(app.table().len(), 2);
        assert!(app.table().position_of(1).is_none());
    }

    #[test]
    fn failed_update_keeps_table_and_raises_alert() {
        let store = seeded_store();
        store
            .connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER freeze BEFORE UPDATE ON customers
                 BEGIN SELECT RAISE(ABORT, 'customers are frozen'); END;",
            )
            .unwrap();
        let mut app = App::new(Box::new(store));
        let before: Vec<_> = app.table().rows().to_vec();

        app.handle_key(KeyCode::Char('e'));
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, " changed");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.alert(), Some("Failed to update customer."));
        assert_eq!(app.table().rows(), before.as_slice());
    }

    #[test]
    fn mutations_on_sample_data_fail() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.disconnect();
        let mut app = App::new(Box::new(store));
        assert!(app.table().is_placeholder());

        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "C5");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.alert(), Some("Failed to add customer."));
        assert_eq!(app.table().len(), 2);
    }

    #[test]
    fn escape_in_filter_clears_it() {
        let mut app = App::new(Box::new(seeded_store()));
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "zeta");
        assert_eq!(app.view().len(), 1);
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.view().len(), 3);
        assert!(app.view().filter().is_none());
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = App::new(Box::new(seeded_store()));
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
        app.shutdown();
    }
}
