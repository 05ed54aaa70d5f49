// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod envelope;
pub(crate) mod lang;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_u64(value: &Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_u32(value: &Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn label_names(labels: &Option<Vec<LabelModel>>) -> String {
    labels.as_ref().map_or_else(String::new, |labels| {
        labels
            .iter()
            .map(|label| label.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    })
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Tabled)]
pub(crate) struct UserProfile {
    #[tabled(rename = "Username")]
    pub(crate) username: String,
    #[serde(default)]
    #[tabled(rename = "ID", display_with = "opt_u64")]
    pub(crate) id: Option<u64>,
    #[serde(default)]
    #[tabled(rename = "Member Since", display_with = "opt_str")]
    pub(crate) created_at: Option<String>,
}

impl UserProfile {
    pub(crate) fn named(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            id: None,
            created_at: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Tabled)]
pub(crate) struct BoxModel {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[serde(default)]
    #[tabled(rename = "Description", display_with = "opt_str")]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Created", display_with = "opt_str")]
    pub(crate) created_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Tabled)]
pub(crate) struct ItemModel {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[serde(default)]
    #[tabled(rename = "Quantity", display_with = "opt_u32")]
    pub(crate) quantity: Option<u32>,
    #[serde(default)]
    #[tabled(rename = "Box", display_with = "opt_u64")]
    pub(crate) box_id: Option<u64>,
    #[serde(default)]
    #[tabled(rename = "Labels", display_with = "label_names")]
    pub(crate) labels: Option<Vec<LabelModel>>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Tabled)]
pub(crate) struct LabelModel {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[serde(default)]
    #[tabled(rename = "Color", display_with = "opt_str")]
    pub(crate) color: Option<String>,
}
