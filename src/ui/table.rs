use tabled::{settings::Style, Table, Tabled};
use crate::report::{DatedVisit, PlaceFeeRow, PlaceVisits};
use crate::ui::money;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct VisitRow<'a> {
    #[tabled(rename = "Place")]
    place: &'a str,
    #[tabled(rename = "Reservations")]
    count: u32,
}

#[derive(Tabled)]
struct DatedRow<'a> {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Place")]
    place: &'a str,
}

#[derive(Tabled)]
struct FeeRow<'a> {
    #[tabled(rename = "First name")]
    first_name: &'a str,
    #[tabled(rename = "Last name")]
    last_name: &'a str,
    #[tabled(rename = "Reservations")]
    count: u32,
    #[tabled(rename = "Total fee")]
    total_fee: String,
}

/// Reservation counts per place
pub fn visits_table(visits: &[PlaceVisits]) -> String {
    let rows: Vec<VisitRow> = visits
        .iter()
        .map(|v| VisitRow { place: &v.place, count: v.count })
        .collect();
    render(&rows)
}

/// Reservations inside a date range
pub fn range_table(visits: &[DatedVisit]) -> String {
    let rows: Vec<DatedRow> = visits
        .iter()
        .map(|v| DatedRow { date: v.date.to_string(), place: &v.place })
        .collect();
    render(&rows)
}

/// Per-person totals at a place
pub fn fee_table(fees: &[PlaceFeeRow]) -> String {
    let rows: Vec<FeeRow> = fees
        .iter()
        .map(|f| FeeRow {
            first_name: &f.first_name,
            last_name: &f.last_name,
            count: f.reservation_count,
            total_fee: money(f.total_fee),
        })
        .collect();
    render(&rows)
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}
