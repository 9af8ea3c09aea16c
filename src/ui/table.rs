use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Two-column metric table
#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        rounded(&self.rows)
    }
}

#[derive(Tabled)]
pub struct InventoryRow {
    #[tabled(rename = "Type")]
    pub cim_type: String,
    #[tabled(rename = "Objects")]
    pub count: usize,
    #[tabled(rename = "Ids")]
    pub ids: String,
}

#[derive(Tabled)]
pub struct ModelRow {
    #[tabled(rename = "Id")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Objects")]
    pub objects: usize,
}

#[derive(Tabled)]
pub struct ClassRow {
    #[tabled(rename = "Attribute")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Type")]
    pub value_type: String,
    #[tabled(rename = "Storage")]
    pub storage: String,
}

/// Render rows with the rounded style used across the CLI
pub fn rounded<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Compress sorted ids into ranges: `1-3, 7`
pub fn id_ranges(ids: &[i64]) -> String {
    let mut parts = Vec::new();
    let mut iter = ids.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ranges() {
        assert_eq!(id_ranges(&[1, 2, 3, 7, 9, 10]), "1-3, 7, 9-10");
        assert_eq!(id_ranges(&[]), "");
    }

    #[test]
    fn test_empty_builder() {
        assert!(TableBuilder::new().build().is_empty());
        let mut builder = TableBuilder::new();
        builder.add_row("Models", "2");
        assert!(builder.build().contains("Models"));
    }
}
