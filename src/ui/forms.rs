use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Customer, CustomerFields};

/// Fields of the customer editor, in the order they are shown and bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormField {
    Coid,
    CompanyName,
    ShortName,
    ContactPerson,
    Phone,
    Email,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
    Active,
}

impl FormField {
    pub(crate) const ALL: [FormField; 13] = [
        FormField::Coid,
        FormField::CompanyName,
        FormField::ShortName,
        FormField::ContactPerson,
        FormField::Phone,
        FormField::Email,
        FormField::AddressLine1,
        FormField::AddressLine2,
        FormField::City,
        FormField::State,
        FormField::PostalCode,
        FormField::Country,
        FormField::Active,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Coid => "COID",
            FormField::CompanyName => "Company Name",
            FormField::ShortName => "Short Name",
            FormField::ContactPerson => "Contact Person",
            FormField::Phone => "Phone",
            FormField::Email => "Email",
            FormField::AddressLine1 => "Address Line 1",
            FormField::AddressLine2 => "Address Line 2",
            FormField::City => "City",
            FormField::State => "State",
            FormField::PostalCode => "Postal Code",
            FormField::Country => "Country",
            FormField::Active => "Active",
        }
    }

    fn index(self) -> usize {
        FormField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    /// Width of the widest label, used to align values into one column.
    pub(crate) fn label_width() -> usize {
        FormField::ALL
            .iter()
            .map(|field| field.label().len())
            .max()
            .unwrap_or(0)
    }
}

/// Editor state for creating or editing one customer. No validation happens
/// here: whatever was typed goes to the store as-is.
#[derive(Clone, Debug)]
pub(crate) struct CustomerForm {
    pub(crate) fields: CustomerFields,
    pub(crate) active: FormField,
}

impl CustomerForm {
    /// Empty form for a new customer. New customers start out active.
    pub(crate) fn blank() -> Self {
        Self {
            fields: CustomerFields {
                is_active: true,
                ..CustomerFields::default()
            },
            active: FormField::Coid,
        }
    }

    /// Pre-fill every field from an existing customer.
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            fields: customer.fields.clone(),
            active: FormField::Coid,
        }
    }

    pub(crate) fn next_field(&mut self) {
        let next = (self.active.index() + 1) % FormField::ALL.len();
        self.active = FormField::ALL[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = FormField::ALL.len();
        let previous = (self.active.index() + len - 1) % len;
        self.active = FormField::ALL[previous];
    }

    /// Type into the focused field. On the Active checkbox only Space does
    /// anything, toggling it.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.text_mut(self.active) {
            Some(value) => {
                value.push(ch);
                true
            }
            None if ch == ' ' => {
                self.toggle_active();
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.text_mut(self.active) {
            value.pop();
        }
    }

    pub(crate) fn toggle_active(&mut self) {
        self.fields.is_active = !self.fields.is_active;
    }

    /// The values to hand to the store, in its bind order.
    pub(crate) fn to_fields(&self) -> CustomerFields {
        self.fields.clone()
    }

    pub(crate) fn text(&self, field: FormField) -> Option<&str> {
        let fields = &self.fields;
        let value = match field {
            FormField::Coid => &fields.coid,
            FormField::CompanyName => &fields.company_name,
            FormField::ShortName => &fields.short_name,
            FormField::ContactPerson => &fields.contact_person,
            FormField::Phone => &fields.phone,
            FormField::Email => &fields.email,
            FormField::AddressLine1 => &fields.address_line1,
            FormField::AddressLine2 => &fields.address_line2,
            FormField::City => &fields.city,
            FormField::State => &fields.state,
            FormField::PostalCode => &fields.postal_code,
            FormField::Country => &fields.country,
            FormField::Active => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        let fields = &mut self.fields;
        let value = match field {
            FormField::Coid => &mut fields.coid,
            FormField::CompanyName => &mut fields.company_name,
            FormField::ShortName => &mut fields.short_name,
            FormField::ContactPerson => &mut fields.contact_person,
            FormField::Phone => &mut fields.phone,
            FormField::Email => &mut fields.email,
            FormField::AddressLine1 => &mut fields.address_line1,
            FormField::AddressLine2 => &mut fields.address_line2,
            FormField::City => &mut fields.city,
            FormField::State => &mut fields.state,
            FormField::PostalCode => &mut fields.postal_code,
            FormField::Country => &mut fields.country,
            FormField::Active => return None,
        };
        Some(value)
    }

    /// Render one labelled row. Text fields show a dim placeholder when empty;
    /// the Active field renders as a checkbox.
    pub(crate) fn build_line(&self, field: FormField) -> Line<'static> {
        let is_active = self.active == field;
        let label = format!("{:>width$}: ", field.label(), width = FormField::label_width());

        let (display, empty) = match self.text(field) {
            Some(value) if value.is_empty() => ("<empty>".to_string(), true),
            Some(value) => (value.to_string(), false),
            None => {
                let mark = if self.fields.is_active { "[x]" } else { "[ ]" };
                (mark.to_string(), false)
            }
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![Span::raw(label), Span::styled(display, style)])
    }

    /// Cursor column offset for the focused field, past its label.
    pub(crate) fn cursor_offset(&self) -> usize {
        let prefix = FormField::label_width() + 2;
        match self.text(self.active) {
            Some(value) => prefix + value.chars().count(),
            None => prefix + 1,
        }
    }

    pub(crate) fn active_row(&self) -> usize {
        self.active.index()
    }
}

/// Pending deletion awaiting an explicit yes/no.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmCustomerDelete {
    pub(crate) id: i64,
    pub(crate) company_name: String,
}

impl ConfirmCustomerDelete {
    pub(crate) fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            company_name: customer.fields.company_name.clone(),
        }
    }
}

/// Severity of a modal alert.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AlertKind {
    Warning,
    Error,
}

impl AlertKind {
    pub(crate) fn title(self) -> &'static str {
        match self {
            AlertKind::Warning => "Warning",
            AlertKind::Error => "Error",
        }
    }

    pub(crate) fn color(self) -> Color {
        match self {
            AlertKind::Warning => Color::Yellow,
            AlertKind::Error => Color::Red,
        }
    }
}

/// Modal message the user has to dismiss before doing anything else.
#[derive(Clone, Debug)]
pub(crate) struct Alert {
    pub(crate) kind: AlertKind,
    pub(crate) message: String,
    pub(crate) detail: Option<String>,
}

impl Alert {
    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer {
            id: 9,
            fields: CustomerFields {
                coid: "C009".into(),
                company_name: "Nine Ltd".into(),
                short_name: "N".into(),
                contact_person: "Nina".into(),
                phone: "999".into(),
                email: "nina@nine.test".into(),
                address_line1: "9 Ninth St".into(),
                address_line2: String::new(),
                city: "Ninetown".into(),
                state: "NN".into(),
                postal_code: "99999".into(),
                country: "NZ".into(),
                is_active: false,
            },
            date_created: "2024-09-09 09:09:09".into(),
            date_updated: "2024-09-09 09:09:09".into(),
        }
    }

    #[test]
    fn blank_form_starts_empty_and_active() {
        let form = CustomerForm::blank();
        assert!(form.fields.is_active);
        assert!(FormField::ALL[..12]
            .iter()
            .all(|field| form.text(*field) == Some("")));
    }

    #[test]
    fn edit_form_is_prefilled_from_named_fields() {
        let customer = sample();
        let form = CustomerForm::from_customer(&customer);
        assert_eq!(form.text(FormField::Coid), Some("C009"));
        assert_eq!(form.text(FormField::Country), Some("NZ"));
        assert_eq!(form.to_fields(), customer.fields);
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = CustomerForm::blank();
        form.active = FormField::City;
        for ch in "Lima".chars() {
            assert!(form.push_char(ch));
        }
        form.backspace();
        assert_eq!(form.text(FormField::City), Some("Lim"));
        assert_eq!(form.text(FormField::Coid), Some(""));
        assert!(!form.push_char('\u{7}'));
    }

    #[test]
    fn space_toggles_the_active_checkbox() {
        let mut form = CustomerForm::blank();
        form.active = FormField::Active;
        assert!(form.push_char(' '));
        assert!(!form.fields.is_active);
        assert!(!form.push_char('x'));
        assert!(!form.fields.is_active);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = CustomerForm::blank();
        form.previous_field();
        assert_eq!(form.active, FormField::Active);
        form.next_field();
        assert_eq!(form.active, FormField::Coid);
        assert_eq!(form.active_row(), 0);
    }

    #[test]
    fn checkbox_line_reflects_flag() {
        let form = CustomerForm::from_customer(&sample());
        let line = form.build_line(FormField::Active);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert!(text.ends_with("[ ]"));
    }
}
