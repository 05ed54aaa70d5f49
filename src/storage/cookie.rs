// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;

use crate::{
    error::{self, Result},
    metadata,
    model::lang::Lang,
    session,
};

use super::{IsPersistent, Storage};

const TOKEN_COOKIE: &str = "jwt";
const LANG_COOKIE: &str = "language";

// Matches the browser deployment: roughly two years, root path, lax same-site.
const MAX_AGE_SECS: u64 = 2 * 365 * 24 * 60 * 60;
const ATTRIBUTES: &str = "Path=/; SameSite=Lax";

/// Splits a cookie header or jar line into `name=value` pairs, ignoring parts
/// without an `=`.
pub(crate) fn split_pairs(input: &str) -> impl Iterator<Item = (&str, &str)> {
    input
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// The cookie discipline: a text file of one cookie per line with an absolute
/// expiry. Only the token and language are persisted; the user profile is
/// re-fetched from the server on the next cold start.
pub(crate) struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS.as_ref().map(|dirs| Self {
            path: dirs.data_dir().to_owned().join(file),
        })
    }

    #[cfg(test)]
    pub(crate) fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    fn parse_line(line: &str) -> Result<(String, String, u64)> {
        let mut pairs = split_pairs(line);
        let (name, value) = pairs
            .next()
            .ok_or_else(|| error::Storage::Malformed(format!("cookie line {line:?}")))?;

        let mut expires = u64::MAX;
        for (attribute, attribute_value) in pairs {
            if attribute.eq_ignore_ascii_case("expires") {
                expires = attribute_value.parse().map_err(|_| {
                    error::Storage::Malformed(format!("cookie expiry {attribute_value:?}"))
                })?;
            }
        }

        Ok((name.to_owned(), value.to_owned(), expires))
    }
}

impl IsPersistent for CookieJar {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl Storage<session::Data> for CookieJar {
    async fn get(&mut self) -> Result<Option<session::Data>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let now = unix_now();
        let mut data = session::Data::default();
        let mut found = false;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, value, expires) = Self::parse_line(line)?;
            if expires <= now || value.is_empty() {
                continue;
            }

            match name.as_str() {
                TOKEN_COOKIE => {
                    data.set_token(Some(value));
                    found = true;
                }
                LANG_COOKIE => {
                    if let Some(lang) = Lang::parse(&value) {
                        data.set_lang(Some(lang));
                        found = true;
                    }
                }
                _ => {}
            }
        }

        Ok(found.then_some(data))
    }

    async fn update(&mut self, data: &session::Data) -> Result<()> {
        let expires = unix_now() + MAX_AGE_SECS;
        let mut lines = Vec::new();
        if let Some(token) = data.token() {
            lines.push(format!(
                "{TOKEN_COOKIE}={token}; Expires={expires}; Max-Age={MAX_AGE_SECS}; {ATTRIBUTES}"
            ));
        }
        if let Some(lang) = data.lang() {
            lines.push(format!(
                "{LANG_COOKIE}={lang}; Expires={expires}; Max-Age={MAX_AGE_SECS}; {ATTRIBUTES}"
            ));
        }

        if lines.is_empty() {
            return self.clear().await;
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, lines.join("\n") + "\n")?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::UserProfile;

    use super::*;

    #[tokio::test]
    async fn round_trip_token_and_language() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut jar = CookieJar::at(dir.path().join("cookies.txt"));

        assert!(jar.get().await?.is_none());

        let mut data = session::Data::with_token("abc.def.ghi");
        data.set_lang(Some(Lang::Fr));
        jar.update(&data).await?;

        let restored = jar.get().await?.expect("persisted record");
        assert_eq!(restored.token(), Some("abc.def.ghi"));
        assert_eq!(restored.lang(), Some(Lang::Fr));

        jar.clear().await?;
        assert!(jar.get().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn profile_is_never_persisted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut jar = CookieJar::at(dir.path().join("cookies.txt"));

        let mut data = session::Data::with_token("abc");
        data.set_user(Some(UserProfile::named("alice")));
        jar.update(&data).await?;

        let restored = jar.get().await?.expect("persisted record");
        assert_eq!(restored.user(), None);
        Ok(())
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cookies.txt");
        fs::write(
            &path,
            "jwt=stale; Expires=1; Max-Age=0; Path=/; SameSite=Lax\n",
        )?;

        let mut jar = CookieJar::at(&path);
        assert!(jar.get().await?.is_none());
        Ok(())
    }

    #[test]
    fn split_pairs_tolerates_padding() {
        let pairs: Vec<_> = split_pairs("language=fr;  jwt=abc ; bare").collect();
        assert_eq!(pairs, vec![("language", "fr"), ("jwt", "abc")]);
    }
}
