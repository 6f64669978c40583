//! Viewer roles and the dashboard panels each role is shown.

use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Who is looking at the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Farmer,
    PolicyMaker,
    Researcher,
}

/// Where a panel's series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelSource {
    Historical,
    Forecast,
}

/// One titled date window of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: PanelSource,
}

impl Panel {
    fn new(label: String, start: NaiveDate, end: NaiveDate, source: PanelSource) -> Self {
        Panel {
            label,
            start,
            end,
            source,
        }
    }

    /// File name used when a panel's series is exported.
    pub fn export_file_name(&self, village: &str) -> String {
        format!("{}_{}.csv", village.trim(), self.label.replace(' ', "_"))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

impl Role {
    /// Plural heading used in dashboard titles.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Farmer => "Farmers",
            Role::PolicyMaker => "Policy Makers",
            Role::Researcher => "Researchers",
        }
    }

    /// Farmers only look at the charts; other roles may download the data.
    pub fn can_export(&self) -> bool {
        !matches!(self, Role::Farmer)
    }

    /// Panels for this role in display order.
    ///
    /// `past` and `future` are the user-selected windows; Farmers ignore them
    /// and always get the fixed 2016-2024 history and 2025-2026 forecast.
    pub fn panels(
        &self,
        past: (NaiveDate, NaiveDate),
        future: (NaiveDate, NaiveDate),
    ) -> Vec<Panel> {
        let mut panels = Vec::new();
        match self {
            Role::Farmer => {
                if let (Some(s), Some(e)) = (ymd(2016, 1, 1), ymd(2024, 12, 31)) {
                    panels.push(Panel::new("2016-2024".into(), s, e, PanelSource::Historical));
                }
                if let (Some(s), Some(e)) = (ymd(2025, 1, 1), ymd(2026, 12, 31)) {
                    panels.push(Panel::new(
                        "2025-2026 (Predicted)".into(),
                        s,
                        e,
                        PanelSource::Forecast,
                    ));
                }
            }
            Role::PolicyMaker | Role::Researcher => {
                if *self == Role::Researcher {
                    if let (Some(s), Some(e)) = (ymd(2014, 1, 1), ymd(2016, 12, 31)) {
                        panels.push(Panel::new("2014-2016".into(), s, e, PanelSource::Historical));
                    }
                }
                panels.push(Panel::new(
                    format!("Past ({}-{})", past.0.year(), past.1.year()),
                    past.0,
                    past.1,
                    PanelSource::Historical,
                ));
                panels.push(Panel::new(
                    format!("Future ({}-{})", future.0.year(), future.1.year()),
                    future.0,
                    future.1,
                    PanelSource::Forecast,
                ));
            }
        }
        panels
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "farmer" | "farmers" => Ok(Role::Farmer),
            "policy-maker" | "policy-makers" | "policymaker" => Ok(Role::PolicyMaker),
            "researcher" | "researchers" => Ok(Role::Researcher),
            other => Err(CoreError::InvalidFormat(format!("unknown role '{}'", other))),
        }
    }
}
