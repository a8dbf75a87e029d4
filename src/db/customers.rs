use rusqlite::{params, Connection, Row};

use crate::models::{Customer, CustomerFields};

use super::StoreError;

/// Explicit column list so rows map by name order, never by `SELECT *`.
const SELECT_CUSTOMERS: &str = "SELECT id, coid, company_name, short_name, contact_person,
        phone, email, address_line1, address_line2, city, state, postal_code,
        country, is_active, date_created, date_updated
     FROM customers";

/// Retrieve every customer. No ORDER BY: the view decides how rows are shown.
pub(crate) fn fetch_customers(conn: &Connection) -> Result<Vec<Customer>, StoreError> {
    let mut stmt = conn
        .prepare(SELECT_CUSTOMERS)
        .map_err(StoreError::statement("list"))?;

    let customers = stmt
        .query_map([], customer_from_row)
        .map_err(StoreError::statement("list"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::statement("list"))?;

    Ok(customers)
}

/// Insert a customer inside its own transaction. Dropping the transaction on
/// the error path rolls it back.
pub(crate) fn insert_customer(conn: &Connection, fields: &CustomerFields) -> Result<i64, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(StoreError::statement("add"))?;

    tx.execute(
        "INSERT INTO customers (
            coid, company_name, short_name, contact_person, phone, email,
            address_line1, address_line2, city, state, postal_code, country,
            is_active
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            fields.coid,
            fields.company_name,
            fields.short_name,
            fields.contact_person,
            fields.phone,
            fields.email,
            fields.address_line1,
            fields.address_line2,
            fields.city,
            fields.state,
            fields.postal_code,
            fields.country,
            fields.is_active,
        ],
    )
    .map_err(StoreError::statement("add"))?;

    let id = tx.last_insert_rowid();
    tx.commit().map_err(StoreError::statement("add"))?;
    Ok(id)
}

/// Overwrite every editable column. Zero touched rows means someone else
/// removed the customer, which we surface instead of pretending it worked.
pub(crate) fn update_customer(
    conn: &Connection,
    id: i64,
    fields: &CustomerFields,
) -> Result<(), StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(StoreError::statement("update"))?;

    let updated = tx
        .execute(
            "UPDATE customers SET
                coid = ?1, company_name = ?2, short_name = ?3, contact_person = ?4,
                phone = ?5, email = ?6, address_line1 = ?7, address_line2 = ?8,
                city = ?9, state = ?10, postal_code = ?11, country = ?12,
                is_active = ?13, date_updated = CURRENT_TIMESTAMP
             WHERE id = ?14",
            params![
                fields.coid,
                fields.company_name,
                fields.short_name,
                fields.contact_person,
                fields.phone,
                fields.email,
                fields.address_line1,
                fields.address_line2,
                fields.city,
                fields.state,
                fields.postal_code,
                fields.country,
                fields.is_active,
                id,
            ],
        )
        .map_err(StoreError::statement("update"))?;

    if updated == 0 {
        return Err(StoreError::NotFound { id });
    }

    tx.commit().map_err(StoreError::statement("update"))
}

pub(crate) fn delete_customer(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(StoreError::statement("delete"))?;

    let deleted = tx
        .execute("DELETE FROM customers WHERE id = ?1", params![id])
        .map_err(StoreError::statement("delete"))?;

    if deleted == 0 {
        return Err(StoreError::NotFound { id });
    }

    tx.commit().map_err(StoreError::statement("delete"))
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        fields: CustomerFields {
            coid: row.get(1)?,
            company_name: row.get(2)?,
            short_name: row.get(3)?,
            contact_person: row.get(4)?,
            phone: row.get(5)?,
            email: row.get(6)?,
            address_line1: row.get(7)?,
            address_line2: row.get(8)?,
            city: row.get(9)?,
            state: row.get(10)?,
            postal_code: row.get(11)?,
            country: row.get(12)?,
            is_active: row.get(13)?,
        },
        date_created: row.get(14)?,
        date_updated: row.get(15)?,
    })
}
