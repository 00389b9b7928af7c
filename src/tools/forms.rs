use crate::tools::ToolKind;
use std::collections::BTreeMap;

/// Field names for one tool's input form. The names double as payload keys
/// on the wire, so they stay in the service's camelCase convention.
pub fn fields(kind: ToolKind) -> &'static [&'static str] {
    match kind {
        ToolKind::Idea => &["sector", "interest"],
        ToolKind::Cv => &[],
        ToolKind::Product => &["projectName", "description"],
        ToolKind::Market => &["sector", "location", "target"],
        ToolKind::Plan => &["name", "valueProp", "revenue"],
        ToolKind::Deck => &["startupName", "problem", "solution"],
        ToolKind::FullPlan => &[
            "name",
            "industry",
            "problem",
            "solution",
            "competitors",
            "targetMarket",
            "revenueModel",
        ],
        ToolKind::Swot => &["name", "description"],
        ToolKind::InvestorPitch => &["name", "description", "targetMarket", "amount"],
        ToolKind::Gtm => &["name", "industry", "target", "pricing"],
        ToolKind::Finance => &["name", "revenueModel", "initialCap", "burnRate"],
        ToolKind::DescGen => &["projectName", "features"],
    }
}

fn seeded_record(kind: ToolKind) -> BTreeMap<String, String> {
    let mut record: BTreeMap<String, String> = fields(kind)
        .iter()
        .map(|field| (field.to_string(), String::new()))
        .collect();

    // Market analysis ships with regional defaults.
    if kind == ToolKind::Market {
        record.insert("location".to_string(), "السعودية والخليج".to_string());
        record.insert("target".to_string(), "B2C".to_string());
    }
    record
}

/// Holds exactly one form record per tool kind for the lifetime of the view.
/// Records are created up front, mutated field by field, and reset (never
/// deleted) when the user returns to the catalog.
pub struct FormStore {
    records: BTreeMap<ToolKind, BTreeMap<String, String>>,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    pub fn new() -> Self {
        Self {
            records: ToolKind::ALL
                .iter()
                .map(|kind| (*kind, seeded_record(*kind)))
                .collect(),
        }
    }

    pub fn record(&self, kind: ToolKind) -> &BTreeMap<String, String> {
        // Every kind is seeded in the constructor.
        &self.records[&kind]
    }

    pub fn value(&self, kind: ToolKind, field: &str) -> &str {
        self.record(kind)
            .get(field)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Updates a single field. Fields outside the tool's form are ignored so
    /// a stray widget id can never widen the payload.
    pub fn set(&mut self, kind: ToolKind, field: &str, value: impl Into<String>) {
        if !fields(kind).contains(&field) {
            return;
        }
        if let Some(record) = self.records.get_mut(&kind) {
            record.insert(field.to_string(), value.into());
        }
    }

    /// Restores the seeded record for one tool.
    pub fn reset(&mut self, kind: ToolKind) {
        self.records.insert(kind, seeded_record(kind));
    }
}
