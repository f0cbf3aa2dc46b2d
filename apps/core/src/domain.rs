use serde::{Deserialize, Serialize};

/// Time window the dashboard aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Today,
    Yesterday,
    Week,
    Month,
}

impl DateRange {
    pub const ALL: [Self; 4] = [Self::Today, Self::Yesterday, Self::Week, Self::Month];

    /// Value sent as the `timeRange` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Today),
            1 => Some(Self::Yesterday),
            2 => Some(Self::Week),
            3 => Some(Self::Month),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Yesterday => 1,
            Self::Week => 2,
            Self::Month => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
        }
    }
}

/// One of the five ranking categories fetched on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankingKind {
    Url,
    Referer,
    Browser,
    Os,
    Device,
}

impl RankingKind {
    pub const ALL: [Self; 5] = [
        Self::Url,
        Self::Referer,
        Self::Browser,
        Self::Os,
        Self::Device,
    ];

    /// Path segment of the stats endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Referer => "referer",
            Self::Browser => "browser",
            Self::Os => "os",
            Self::Device => "device",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Url),
            1 => Some(Self::Referer),
            2 => Some(Self::Browser),
            3 => Some(Self::Os),
            4 => Some(Self::Device),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Url => "Pages",
            Self::Referer => "Referers",
            Self::Browser => "Browsers",
            Self::Os => "Operating systems",
            Self::Device => "Devices",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: String,
    pub name: String,
}

impl Website {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Envelope returned by `/api/websites`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsiteList {
    #[serde(default)]
    pub websites: Vec<Website>,
}

/// The `(website, range)` pair every fetch and redraw is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub website_id: String,
    pub range: DateRange,
}

impl Selection {
    pub fn new(website_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            website_id: website_id.into(),
            range,
        }
    }

    /// No website is selected, which happens when the website list is empty
    /// or failed to load.
    pub fn is_empty(&self) -> bool {
        self.website_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverallStats {
    pub uv: u64,
    pub pv: u64,
    /// Bytes sent.
    pub traffic: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    pub label: String,
    #[serde(alias = "metric")]
    pub count: u64,
}

impl RankingRow {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Results of one refresh fan-out, tied to the selection they were fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatBundle {
    pub selection: Selection,
    pub overall: OverallStats,
    pub urls: Vec<RankingRow>,
    pub referers: Vec<RankingRow>,
    pub browsers: Vec<RankingRow>,
    pub operating_systems: Vec<RankingRow>,
    pub devices: Vec<RankingRow>,
}

impl StatBundle {
    pub fn ranking(&self, kind: RankingKind) -> &[RankingRow] {
        match kind {
            RankingKind::Url => &self.urls,
            RankingKind::Referer => &self.referers,
            RankingKind::Browser => &self.browsers,
            RankingKind::Os => &self.operating_systems,
            RankingKind::Device => &self.devices,
        }
    }

    pub fn rankings(&self) -> impl Iterator<Item = (RankingKind, &[RankingRow])> + '_ {
        RankingKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.ranking(kind)))
    }
}
