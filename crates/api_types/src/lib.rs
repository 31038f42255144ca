//! Wire types shared by the HTTP server and its clients.
//!
//! Everything here is plain serde data; the engine owns the semantics.

use serde::{Deserialize, Serialize};

/// Day totals as shown everywhere: dashboard, bot replies, close-out.
///
/// `all` is net: `pcs + services - expenses`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub pcs: i64,
    pub services: i64,
    pub expenses: i64,
    pub all: i64,
}

/// One line item, category-agnostic.
///
/// `label` carries the category's name field (PC, service or expense name);
/// `date` is only set for rows read back from the archive tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemView {
    pub id: String,
    pub label: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

pub mod line_item {
    use super::*;

    /// Request body for `POST /sessions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionNew {
        pub pc: String,
        pub amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }

    /// Request body for `POST /serviceLogs`.
    ///
    /// `amount` is only honored when the catalog entry allows custom costs;
    /// otherwise the catalog price wins.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceLogNew {
        pub service: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<i64>,
    }

    /// Request body for `POST /expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub amount: i64,
    }

    /// Request body for `PATCH /{category}/{id}`. Absent fields are kept.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LineItemPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }

    /// Response body for a create.
    ///
    /// `mirrored: false` means the durable mirror write failed and the item
    /// exists only in the open day until the next close-out.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: String,
        pub totals: Totals,
        pub mirrored: bool,
    }

    /// Response body for a category listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListResponse {
        pub items: Vec<LineItemView>,
    }
}

pub mod summary {
    use super::*;

    /// Response body for `GET /summary`: the whole open day.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Summary {
        pub totals: Totals,
        pub pcs: Vec<LineItemView>,
        pub services: Vec<LineItemView>,
        pub expenses: Vec<LineItemView>,
    }
}

pub mod search {
    use super::*;

    /// Query string for `GET /search`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SearchQuery {
        pub q: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub staff: Option<String>,
    }

    /// Response body for `GET /search`, hits grouped by category.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SearchResponse {
        pub pcs: Vec<LineItemView>,
        pub services: Vec<LineItemView>,
        pub expenses: Vec<LineItemView>,
    }
}

pub mod catalog {
    use super::*;

    /// A catalog entry as served by `GET /services`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Service {
        pub name: String,
        pub cost: i64,
        #[serde(default)]
        pub emoji: String,
        #[serde(default = "default_true")]
        pub available: bool,
        #[serde(default)]
        pub custom_cost: bool,
    }

    fn default_true() -> bool {
        true
    }

    /// Request body for `PATCH /services/{name}`. `name` renames the entry.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ServicePatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cost: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub emoji: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub available: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_cost: Option<bool>,
    }

    /// Response body for `POST /services/{name}/toggle`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ToggleResponse {
        pub name: String,
        pub available: bool,
    }

    /// Response body for `GET /services`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServicesResponse {
        pub services: Vec<Service>,
    }
}

pub mod history {
    use super::*;

    /// One archived day in `GET /history`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArchivedDay {
        pub date: String,
        pub totals: Totals,
        pub pcs: Vec<LineItemView>,
        pub services: Vec<LineItemView>,
        pub expenses: Vec<LineItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub days: Vec<ArchivedDay>,
    }
}

pub mod close {
    use super::*;

    /// Response body for `POST /closeDay`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CloseDayResponse {
        pub date: String,
        pub totals: Totals,
        /// Path of the generated report file; `None` when generation failed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub report: Option<String>,
    }
}

pub mod log_channel {
    use super::*;

    /// Request body for `PUT /logChannel`; `channel_id: null` unbinds.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogChannelSet {
        pub channel_id: Option<i64>,
    }

    /// Response body for `GET /logChannel`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogChannelResponse {
        pub channel_id: Option<i64>,
    }
}
