//! # Status Page Extraction
//!
//! Phone status pages are not self-describing: the battery block is the
//! third `<table>` of the document, with one row per metric and the value
//! printed right after a fixed label. A [`TableExtractor`] captures that
//! layout as a table index plus a list of `label → field` rules, so the
//! device contract lives in data rather than in control flow.

use scraper::{ElementRef, Html, Selector};

use crate::error::ScanError;

/// Zero-based position of the battery table on the phone's home page.
pub const BATTERY_TABLE_INDEX: usize = 2;

/// Rules for the battery table of the phone's home page.
pub const BATTERY_RULES: &[FieldRule] = &[
    FieldRule::new("Battery health", Field::Health),
    FieldRule::new("Battery temperature:", Field::Temperature),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Health,
    Temperature,
}

/// Maps a row label to the field that receives the text following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub label: &'static str,
    pub field: Field,
}

impl FieldRule {
    pub const fn new(label: &'static str, field: Field) -> Self {
        Self { label, field }
    }
}

/// Values found on a page. A field stays empty when no row matched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatteryFields {
    pub health: String,
    pub temperature: String,
}

impl BatteryFields {
    fn set(&mut self, field: Field, value: &str) {
        let slot: &mut String = match field {
            Field::Health => &mut self.health,
            Field::Temperature => &mut self.temperature,
        };
        *slot = value.to_string();
    }
}

pub struct TableExtractor {
    table_index: usize,
    rules: Vec<FieldRule>,
    tables: Selector,
    rows: Selector,
}

impl TableExtractor {
    pub fn new(table_index: usize, rules: &[FieldRule]) -> Result<Self, ScanError> {
        Ok(Self {
            table_index,
            rules: rules.to_vec(),
            tables: selector("table")?,
            rows: selector("tr")?,
        })
    }

    /// Extractor for the phone's battery table.
    pub fn battery() -> Result<Self, ScanError> {
        Self::new(BATTERY_TABLE_INDEX, BATTERY_RULES)
    }

    /// Applies the rules to every row of the configured table.
    ///
    /// When several rows carry the same label the last one wins. A page
    /// with fewer tables than expected yields empty fields.
    pub fn extract(&self, html: &str) -> BatteryFields {
        let document: Html = Html::parse_document(html);
        let mut fields = BatteryFields::default();

        let Some(table) = document.select(&self.tables).nth(self.table_index) else {
            return fields;
        };

        for row in table.select(&self.rows) {
            self.apply_rules(row, &mut fields);
        }

        fields
    }

    fn apply_rules(&self, row: ElementRef<'_>, fields: &mut BatteryFields) {
        let text: String = row.text().collect();
        for rule in &self.rules {
            if let Some((_, value)) = text.split_once(rule.label) {
                fields.set(rule.field, value.trim());
            }
        }
    }
}

fn selector(css: &str) -> Result<Selector, ScanError> {
    Selector::parse(css).map_err(|e| ScanError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
