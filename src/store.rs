//! A keyed table of airfoil profiles, persisted as a single JSON file.  Each row holds the 19
//! coordinate pairs of a degree 9 profile in file order: the upper side from tail to nose followed
//! by the lower side from nose to tail, with the nose point written once.

use crate::airfoil::{ProfileCurve, parse_with_policy};
use crate::{DegreePolicy, ImportError, Point2, Profile, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of coordinate pairs in every stored row
pub const STORED_PAIRS: usize = 19;

const STORED_DEGREE: usize = (STORED_PAIRS - 1) / 2;

/// One row of the store.  The two arrays correspond to the `x1..x19` and `y1..y19` columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAirfoil {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl StoredAirfoil {
    fn try_new(name: &str, coords: &[Point2]) -> Result<Self> {
        if coords.len() != STORED_PAIRS {
            return Err(ImportError::MalformedProfile(format!(
                "stored airfoils need exactly {} coordinate pairs, '{}' has {}",
                STORED_PAIRS,
                name,
                coords.len()
            )));
        }
        if let Some(p) = coords.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(ImportError::MalformedProfile(format!(
                "'{}' has a non-finite coordinate pair ({}, {})",
                name, p.x, p.y
            )));
        }
        Ok(Self {
            name: name.to_string(),
            x: coords.iter().map(|p| p.x).collect(),
            y: coords.iter().map(|p| p.y).collect(),
        })
    }

    /// The coordinate pairs in file order
    pub fn pairs(&self) -> Result<Vec<Point2>> {
        if self.x.len() != STORED_PAIRS || self.y.len() != STORED_PAIRS {
            return Err(ImportError::MalformedProfile(format!(
                "stored row '{}' has {} x and {} y values",
                self.name,
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(self
            .x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Point2::new(x, y))
            .collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    airfoils: Vec<StoredAirfoil>,
}

/// The profile store.  The rows are held in memory and every mutation rewrites the whole file
/// through a temporary file and a rename, so an interrupted write leaves the previous content.
#[derive(Debug)]
pub struct AirfoilStore {
    path: PathBuf,
    rows: Vec<StoredAirfoil>,
}

impl AirfoilStore {
    /// Open the store at `path`, creating an empty store file if none exists.
    ///
    /// # Arguments
    ///
    /// * `path`: location of the JSON store file
    ///
    /// returns: Result<AirfoilStore, ImportError>
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                rows: Vec::new(),
            };
            store.write()?;
            log::info!("Created empty airfoil store at {}", path.display());
            return Ok(store);
        }

        let content = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content).map_err(|e| {
            ImportError::StoreIo(format!("cannot decode {}: {}", path.display(), e))
        })?;
        log::debug!(
            "Opened airfoil store {} with {} entries",
            path.display(),
            file.airfoils.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            rows: file.airfoils,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.name == name)
    }

    fn row(&self, name: &str) -> Result<&StoredAirfoil> {
        self.find(name)
            .map(|i| &self.rows[i])
            .ok_or_else(|| ImportError::StoreNotFound(name.to_string()))
    }

    fn write(&self) -> Result<()> {
        let file = StoreFile {
            airfoils: self.rows.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        std::fs::write(&temp, content)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Insert a profile under `name`, or replace the coordinates if the name already exists.
    ///
    /// # Arguments
    ///
    /// * `name`: the airfoil name, which is the key of the row
    /// * `coords`: exactly 19 coordinate pairs in file order
    ///
    /// returns: Result<(), ImportError>
    pub fn upsert(&mut self, name: &str, coords: &[Point2]) -> Result<()> {
        let row = StoredAirfoil::try_new(name, coords)?;
        let previous = match self.find(name) {
            Some(i) => Some(std::mem::replace(&mut self.rows[i], row)),
            None => {
                self.rows.push(row);
                None
            }
        };

        if let Err(e) = self.write() {
            // Roll back the in-memory table to match the untouched file
            match previous {
                Some(old) => {
                    if let Some(i) = self.find(name) {
                        self.rows[i] = old;
                    }
                }
                None => {
                    self.rows.pop();
                }
            }
            return Err(e);
        }

        log::info!("Stored airfoil '{}'", name);
        Ok(())
    }

    /// Look up an airfoil and split it into its two sides, both ordered nose to tail.  The upper
    /// side is pairs 0 to 9 reversed and the lower side is pairs 9 to 18 as stored.
    ///
    /// returns: Result<(Vec<Point2>, Vec<Point2>), ImportError>
    pub fn get(&self, name: &str) -> Result<(Vec<Point2>, Vec<Point2>)> {
        let pairs = self.row(name)?.pairs()?;
        let mut upper = pairs[..=STORED_DEGREE].to_vec();
        upper.reverse();
        let lower = pairs[STORED_DEGREE..].to_vec();
        Ok((upper, lower))
    }

    /// Look up an airfoil as a `Profile`
    pub fn get_profile(&self, name: &str) -> Result<Profile> {
        let (upper, lower) = self.get(name)?;
        Profile::try_new(
            name,
            ProfileCurve::try_new(upper)?,
            ProfileCurve::try_new(lower)?,
        )
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        let i = self
            .find(name)
            .ok_or_else(|| ImportError::StoreNotFound(name.to_string()))?;
        let removed = self.rows.remove(i);
        if let Err(e) = self.write() {
            self.rows.insert(i, removed);
            return Err(e);
        }

        log::info!("Deleted airfoil '{}'", name);
        Ok(())
    }

    /// All airfoil names, sorted case-insensitively
    pub fn list_sorted_names(&self) -> Vec<String> {
        let mut names = self.rows.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
        names.sort_by_cached_key(|n| n.to_lowercase());
        names
    }

    /// Parse a degree 9 profile file and store it under the name from its header line.
    ///
    /// # Arguments
    ///
    /// * `text`: content of a profile file with 19 coordinate pairs
    ///
    /// returns: Result<String, ImportError> with the name the profile was stored under
    pub fn import_bez(&mut self, text: &str) -> Result<String> {
        let parsed = parse_with_policy(text, DegreePolicy::Strict, STORED_DEGREE)?;
        let name = parsed.profile.name.clone();
        self.upsert(&name, &parsed.profile.to_raw_pairs())?;
        Ok(name)
    }
}

/// List the names in the store at `path`, returning an empty list if the store cannot be opened.
/// Used where a listing is informative only, such as populating a selection.
pub fn list_sorted_names_or_empty(path: &Path) -> Vec<String> {
    match AirfoilStore::open(path) {
        Ok(store) => store.list_sorted_names(),
        Err(e) => {
            log::warn!("Airfoil store at {} is unavailable: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct TempStore {
        path: PathBuf,
    }

    impl TempStore {
        fn new() -> Self {
            let path =
                std::env::temp_dir().join(format!("bezfoil_store_{}.json", uuid::Uuid::new_v4()));
            Self { path }
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn coords(offset: f64) -> Vec<Point2> {
        (0..STORED_PAIRS)
            .map(|i| Point2::new(i as f64 + offset, -(i as f64)))
            .collect()
    }

    fn bez_text(name: &str) -> String {
        let mut text = format!("{}\n\n", name);
        for i in 0..STORED_PAIRS {
            let x = ((i as f64) - 9.0).abs() / 9.0;
            let y = if i < 9 { 0.05 * x * (1.0 - x) } else { -0.02 * x * (1.0 - x) };
            text.push_str(&format!("{:.6} {:.6}\n", x, y));
        }
        text
    }

    #[test]
    fn open_creates_file() {
        let temp = TempStore::new();
        let store = AirfoilStore::open(&temp.path).unwrap();
        assert!(store.is_empty());
        assert!(temp.path.exists());
    }

    #[test]
    fn get_splits_sides() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        let c = coords(0.0);
        store.upsert("foil", &c).unwrap();

        let (upper, lower) = store.get("foil").unwrap();
        assert_eq!(upper.len(), 10);
        assert_eq!(lower.len(), 10);
        assert_eq!(upper[0], c[9]);
        assert_eq!(upper[9], c[0]);
        assert_eq!(lower.as_slice(), &c[9..]);
    }

    #[test]
    fn reopen_persists() {
        let temp = TempStore::new();
        {
            let mut store = AirfoilStore::open(&temp.path).unwrap();
            store.upsert("foil", &coords(0.0)).unwrap();
        }
        let store = AirfoilStore::open(&temp.path).unwrap();
        let profile = store.get_profile("foil").unwrap();
        assert_eq!(profile.to_raw_pairs(), coords(0.0));
    }

    #[test]
    fn upsert_replaces() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        store.upsert("foil", &coords(0.0)).unwrap();
        store.upsert("foil", &coords(1.0)).unwrap();
        assert_eq!(store.len(), 1);
        let (upper, _) = store.get("foil").unwrap();
        assert_relative_eq!(upper[9].x, 1.0);
    }

    #[test]
    fn upsert_wrong_count() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        let result = store.upsert("foil", &coords(0.0)[..18]);
        assert!(matches!(result, Err(ImportError::MalformedProfile(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_names() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        assert_eq!(
            store.get("nope").unwrap_err(),
            ImportError::StoreNotFound("nope".to_string())
        );
        assert_eq!(
            store.delete("nope").unwrap_err(),
            ImportError::StoreNotFound("nope".to_string())
        );
    }

    #[test]
    fn delete_and_list() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        for name in ["beta", "Alpha", "gamma"] {
            store.upsert(name, &coords(0.0)).unwrap();
        }
        assert_eq!(store.list_sorted_names(), vec!["Alpha", "beta", "gamma"]);

        store.delete("beta").unwrap();
        let reopened = AirfoilStore::open(&temp.path).unwrap();
        assert_eq!(reopened.list_sorted_names(), vec!["Alpha", "gamma"]);
    }

    #[test]
    fn import_bez_uses_first_line() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        let name = store.import_bez(&bez_text("  MH 32 bez  ")).unwrap();
        assert_eq!(name, "MH 32 bez");
        let profile = store.get_profile("MH 32 bez").unwrap();
        assert_relative_eq!(profile.upper().nose().x, 0.0);
        assert_relative_eq!(profile.upper().tail().x, 1.0);
    }

    #[test]
    fn non_finite_rows_are_rejected() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        store.upsert("good", &coords(0.0)).unwrap();

        let mut bad = coords(0.0);
        bad[3].x = f64::INFINITY;
        let result = store.upsert("bad", &bad);
        assert!(matches!(result, Err(ImportError::MalformedProfile(_))));
        bad[3].x = 0.5;
        bad[12].y = f64::NAN;
        assert!(store.upsert("good", &bad).is_err());

        let huge = bez_text("huge").replacen("1.000000", &format!("1{}.000", "0".repeat(400)), 1);
        assert!(store.import_bez(&huge).is_err());

        let reopened = AirfoilStore::open(&temp.path).unwrap();
        assert_eq!(reopened.list_sorted_names(), vec!["good"]);
        assert_eq!(reopened.get_profile("good").unwrap().to_raw_pairs(), coords(0.0));
    }

    #[test]
    fn import_bez_without_header() {
        let temp = TempStore::new();
        let mut store = AirfoilStore::open(&temp.path).unwrap();
        let text = bez_text("").trim_start().to_string();
        let name = store.import_bez(&text).unwrap();
        assert_eq!(name, "unnamed");
        assert!(store.contains("unnamed"));
    }

    #[test]
    fn corrupt_file() {
        let temp = TempStore::new();
        std::fs::write(&temp.path, "{ not json").unwrap();
        assert!(matches!(
            AirfoilStore::open(&temp.path),
            Err(ImportError::StoreIo(_))
        ));
        assert!(list_sorted_names_or_empty(&temp.path).is_empty());
    }
}
