//! Domain models that mirror the `customers` table and get passed throughout
//! the TUI. These types stay light-weight data holders so the store and the
//! presentation layer can agree on one named field set instead of relying on
//! column positions.

use std::cmp::Ordering;
use std::fmt;

/// The thirteen editable columns of a customer, in the order the insert and
/// update statements bind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFields {
    pub coid: String,
    pub company_name: String,
    pub short_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_active: bool,
}

/// A full row from the store. `id` and both timestamps are assigned by the
/// database and never edited by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub fields: CustomerFields,
    pub date_created: String,
    pub date_updated: String,
}

impl fmt::Display for Customer {
    /// Company name is what confirmation prompts and status messages show.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.company_name)
    }
}

/// Columns of the main table, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Coid,
    CompanyName,
    ShortName,
    Contact,
    Phone,
    Email,
    Address1,
    Address2,
    City,
    State,
    PostalCode,
    Country,
    Active,
    Created,
    Updated,
}

impl Column {
    pub const ALL: [Column; 16] = [
        Column::Id,
        Column::Coid,
        Column::CompanyName,
        Column::ShortName,
        Column::Contact,
        Column::Phone,
        Column::Email,
        Column::Address1,
        Column::Address2,
        Column::City,
        Column::State,
        Column::PostalCode,
        Column::Country,
        Column::Active,
        Column::Created,
        Column::Updated,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Coid => "COID",
            Column::CompanyName => "Company Name",
            Column::ShortName => "Short Name",
            Column::Contact => "Contact",
            Column::Phone => "Phone",
            Column::Email => "Email",
            Column::Address1 => "Address 1",
            Column::Address2 => "Address 2",
            Column::City => "City",
            Column::State => "State",
            Column::PostalCode => "Postal Code",
            Column::Country => "Country",
            Column::Active => "Active",
            Column::Created => "Created",
            Column::Updated => "Updated",
        }
    }

    /// Position of this column in [`Column::ALL`].
    pub fn index(self) -> usize {
        Column::ALL
            .iter()
            .position(|column| *column == self)
            .unwrap_or(0)
    }

    /// Text shown in a table cell. Booleans render as `Yes`/`No`.
    pub fn display(self, customer: &Customer) -> String {
        let fields = &customer.fields;
        match self {
            Column::Id => customer.id.to_string(),
            Column::Coid => fields.coid.clone(),
            Column::CompanyName => fields.company_name.clone(),
            Column::ShortName => fields.short_name.clone(),
            Column::Contact => fields.contact_person.clone(),
            Column::Phone => fields.phone.clone(),
            Column::Email => fields.email.clone(),
            Column::Address1 => fields.address_line1.clone(),
            Column::Address2 => fields.address_line2.clone(),
            Column::City => fields.city.clone(),
            Column::State => fields.state.clone(),
            Column::PostalCode => fields.postal_code.clone(),
            Column::Country => fields.country.clone(),
            Column::Active => (if fields.is_active { "Yes" } else { "No" }).to_string(),
            Column::Created => customer.date_created.clone(),
            Column::Updated => customer.date_updated.clone(),
        }
    }

    /// Compare two customers on this column. Ids compare numerically and the
    /// active flag as a boolean; everything else is case-insensitive text.
    pub fn compare(self, a: &Customer, b: &Customer) -> Ordering {
        match self {
            Column::Id => a.id.cmp(&b.id),
            Column::Active => a.fields.is_active.cmp(&b.fields.is_active),
            _ => self
                .display(a)
                .to_lowercase()
                .cmp(&self.display(b).to_lowercase()),
        }
    }
}

/// Placeholder rows shown when the database is unreachable. They are never
/// written anywhere and the UI labels them as sample data.
pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: 1,
            fields: CustomerFields {
                coid: "C001".into(),
                company_name: "Company A".into(),
                short_name: "CA".into(),
                contact_person: "John Doe".into(),
                phone: "123-456-7890".into(),
                email: "john.doe@companya.com".into(),
                address_line1: "123 Main St".into(),
                address_line2: String::new(),
                city: "Anytown".into(),
                state: "Anystate".into(),
                postal_code: "12345".into(),
                country: "USA".into(),
                is_active: true,
            },
            date_created: "2023-01-01".into(),
            date_updated: "2023-01-01".into(),
        },
        Customer {
            id: 2,
            fields: CustomerFields {
                coid: "C002".into(),
                company_name: "Company B".into(),
                short_name: "CB".into(),
                contact_person: "Jane Smith".into(),
                phone: "098-765-4321".into(),
                email: "jane.smith@companyb.com".into(),
                address_line1: "456 Oak Ave".into(),
                address_line2: String::new(),
                city: "Someville".into(),
                state: "Somestate".into(),
                postal_code: "54321".into(),
                country: "USA".into(),
                is_active: true,
            },
            date_created: "2023-01-02".into(),
            date_updated: "2023-01-02".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i64, company: &str, active: bool) -> Customer {
        Customer {
            id,
            fields: CustomerFields {
                company_name: company.to_string(),
                is_active: active,
                ..CustomerFields::default()
            },
            date_created: String::new(),
            date_updated: String::new(),
        }
    }

    #[test]
    fn headers_follow_column_order() {
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(headers.first(), Some(&"ID"));
        assert_eq!(headers[2], "Company Name");
        assert_eq!(headers.last(), Some(&"Updated"));
        assert_eq!(Column::Active.index(), 13);
    }

    #[test]
    fn active_flag_renders_as_yes_no() {
        assert_eq!(Column::Active.display(&customer(1, "A", true)), "Yes");
        assert_eq!(Column::Active.display(&customer(1, "A", false)), "No");
    }

    #[test]
    fn ids_compare_numerically() {
        let two = customer(2, "x", true);
        let ten = customer(10, "x", true);
        assert_eq!(Column::Id.compare(&two, &ten), Ordering::Less);
    }

    #[test]
    fn text_compares_ignoring_case() {
        let lower = customer(1, "acme", true);
        let upper = customer(2, "Beta", true);
        assert_eq!(Column::CompanyName.compare(&lower, &upper), Ordering::Less);
    }

    #[test]
    fn sample_set_is_not_empty() {
        let samples = sample_customers();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].to_string(), "Company A");
    }
}
