// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, fs, path::Path};

use log::error;

use crate::{error::Result, model::lang::Lang};

static BUILTIN: &str = include_str!("../strings.json");

/// The translation table, loaded once and cached for the life of the
/// process. Lookup resolves exact language, then English, then the id
/// itself, so a missing key is visibly identifiable rather than blank.
pub(crate) struct Translations {
    table: HashMap<String, HashMap<Lang, String>>,
}

impl Translations {
    pub(crate) fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// The table shipped with the binary. A malformed build asset degrades to
    /// the empty table rather than aborting.
    pub(crate) fn builtin() -> Self {
        match Self::from_str(BUILTIN) {
            Ok(translations) => translations,
            Err(e) => {
                error!("The built-in translation table is malformed: {}", e);
                Self::empty()
            }
        }
    }

    /// Loads a replacement table from disk. Any failure degrades to the empty
    /// table, and every lookup then returns its id.
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path).map_err(Into::into).and_then(|contents| Self::from_str(&contents)) {
            Ok(translations) => translations,
            Err(e) => {
                error!(
                    "Failed to load translations from {}: {}",
                    path.as_ref().display(),
                    e
                );
                Self::empty()
            }
        }
    }

    fn from_str(contents: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, String>> = serde_json::from_str(contents)?;

        let mut table = HashMap::new();
        for (id, by_lang) in raw {
            let mut entry = HashMap::new();
            for (lang, text) in by_lang {
                // Entries for languages outside the supported set are
                // dropped rather than misfiled under English.
                if let Some(lang) = Lang::parse(&lang) {
                    let _ = entry.insert(lang, text);
                }
            }
            let _ = table.insert(id, entry);
        }

        Ok(Self { table })
    }

    pub(crate) fn lookup<'lookup>(&'lookup self, id: &'lookup str, lang: Lang) -> &'lookup str {
        self.table
            .get(id)
            .and_then(|by_lang| by_lang.get(&lang).or_else(|| by_lang.get(&Lang::En)))
            .map_or(id, String::as_str)
    }
}
