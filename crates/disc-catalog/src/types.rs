use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManufacturerRef {
    pub name: String,
    pub category_path: String,
}

impl Display for ManufacturerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.category_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub manufacturer: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscCategory {
    DistanceDriver,
    ControlDriver,
    Midrange,
    PuttApproach,
}

impl DiscCategory {
    pub const ALL: [DiscCategory; 4] = [
        DiscCategory::DistanceDriver,
        DiscCategory::ControlDriver,
        DiscCategory::Midrange,
        DiscCategory::PuttApproach,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DiscCategory::DistanceDriver => "DD",
            DiscCategory::ControlDriver => "CD",
            DiscCategory::Midrange => "MR",
            DiscCategory::PuttApproach => "PT",
        }
    }

    pub fn panel_id(&self) -> String {
        format!("ContentPlaceHolder1_pnl{}", self.code())
    }
}

impl Display for DiscCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscCategory::DistanceDriver => write!(f, "Distance Driver"),
            DiscCategory::ControlDriver => write!(f, "Control Driver"),
            DiscCategory::Midrange => write!(f, "Midrange"),
            DiscCategory::PuttApproach => write!(f, "Putt & Approach"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format!("{n:?}"),
            FieldValue::Missing => String::new(),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Missing => write!(f, "-"),
            other => write!(f, "{}", other.to_cell()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscRecord {
    pub manufacturer: String,
    pub link: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl DiscRecord {
    pub fn new(product: &ProductRef) -> Self {
        Self {
            manufacturer: product.manufacturer.clone(),
            link: product.link.clone(),
            fields: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: FieldValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> FieldValue {
        match key {
            "manufacturer" => FieldValue::Text(self.manufacturer.clone()),
            "link" => FieldValue::Text(self.link.clone()),
            _ => self.fields.get(key).cloned().unwrap_or_default(),
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(FieldValue::as_number)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FieldValue::as_text)
    }

    pub fn name(&self) -> &str {
        self.text("name").unwrap_or("<unnamed>")
    }

    pub fn derive_stability(&mut self) {
        let stability = match (self.number("fade"), self.number("turn")) {
            (Some(fade), Some(turn)) => FieldValue::Number(fade + turn),
            _ => FieldValue::Missing,
        };
        self.set("stability", stability);
    }

    // manufacturer, speed, stability, name; missing values sort last
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.manufacturer
            .cmp(&other.manufacturer)
            .then_with(|| missing_last(self.number("speed"), other.number("speed"), f64::total_cmp))
            .then_with(|| {
                missing_last(
                    self.number("stability"),
                    other.number("stability"),
                    f64::total_cmp,
                )
            })
            .then_with(|| missing_last(self.text("name"), other.text("name"), |a, b| a.cmp(b)))
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Display for DiscRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} ─ {}", self.manufacturer, self.name())?;
        for (key, value) in &self.fields {
            if key != "name" {
                writeln!(f, "│  {key}: {value}")?;
            }
        }
        write!(f, "└─ {}", self.link)
    }
}
