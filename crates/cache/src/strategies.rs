use super::*;
use anyhow::Context;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use tp_core::*;
use tp_fingerprint::*;
use tp_state::*;

/// Outcome of the last load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// No manifest, or one that could not be read or parsed.
    Missing(String),
    /// Manifest read but incompatible; the index is empty.
    Rejected(Mismatch),
}

/// Reads a strategy cache from disk.
///
/// Loading is the only way to obtain a queryable [`Strategies`], so a lookup
/// against a cache that was never loaded does not compile.
#[derive(Debug, Clone)]
pub struct Loader {
    root: PathBuf,
    expected: Expectation,
}

impl Loader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            expected: Expectation::default(),
        }
    }
    pub fn expect(mut self, expected: Expectation) -> Self {
        self.expected = expected;
        self
    }
    /// Reads the manifest and every record under each supported street.
    /// Never fails: problems degrade to an empty or partial index and are
    /// reported through [`Strategies::status`] and the log.
    pub fn load(self) -> Strategies {
        let path = self.root.join(CACHE_MANIFEST);
        log::info!("{:<32}{:<32}", "loading strategy cache", path.display());
        let manifest = match read_manifest(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!("{:<32}{:<32}", "strategy cache unavailable", format!("{:#}", e));
                return Strategies::empty(LoadStatus::Missing(format!("{:#}", e)));
            }
        };
        if let Err(mismatch) = manifest.validate(&self.expected) {
            log::warn!("{:<32}{:<32}", "strategy cache rejected", mismatch);
            return Strategies::empty(LoadStatus::Rejected(mismatch));
        }
        let entries = manifest
            .supported_streets
            .iter()
            .flat_map(|street| self.street(*street, &manifest.version))
            .collect::<Vec<_>>();
        Strategies::build(manifest, entries)
    }
    /// Every valid record in `root/<street>/`, in file name order.
    fn street(&self, street: Street, version: &str) -> Vec<Entry> {
        let dir = self.root.join(street.label());
        let mut files = match std::fs::read_dir(&dir) {
            Ok(dir) => dir
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect::<Vec<_>>(),
            Err(_) => {
                log::debug!("{:<32}{:<32}", "no street directory", dir.display());
                Vec::new()
            }
        };
        files.sort();
        files
            .into_iter()
            .filter_map(|path| match read_record(&path) {
                Ok(record) => match record.validate(version) {
                    Ok(()) => Some(Entry::new(record, street)),
                    Err(e) => {
                        log::warn!("{:<32}{:<32}", "skipping invalid record", format!("{}: {:#}", path.display(), e));
                        None
                    }
                },
                Err(e) => {
                    log::warn!("{:<32}{:<32}", "skipping unreadable record", format!("{}: {:#}", path.display(), e));
                    None
                }
            })
            .collect()
    }
}

/// In-memory strategy index.
///
/// Records are kept in load order. Fingerprints index exact lookups (first
/// loaded wins on duplicates); streets index approximate lookups.
#[derive(Debug, Clone)]
pub struct Strategies {
    status: LoadStatus,
    manifest: Option<Manifest>,
    entries: Vec<Entry>,
    exact: HashMap<Fingerprint, usize>,
    streets: BTreeMap<Street, Vec<usize>>,
}

impl Strategies {
    /// An index with no manifest. Every query misses.
    pub fn empty(status: LoadStatus) -> Self {
        Self {
            status,
            manifest: None,
            entries: Vec::new(),
            exact: HashMap::new(),
            streets: BTreeMap::new(),
        }
    }
    /// Indexes entries under a validated manifest, seeding one synthetic
    /// entry into every supported street left empty. Entries for streets the
    /// manifest does not list are ignored.
    pub fn build(manifest: Manifest, entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut index = Self::empty(LoadStatus::Loaded);
        entries
            .into_iter()
            .filter(|entry| manifest.supports(entry.street()))
            .for_each(|entry| index.insert(entry));
        for street in manifest.supported_streets.iter().copied() {
            if !index.streets.contains_key(&street) {
                log::info!("{:<32}{:<32}", "seeding synthetic entry", street);
                index.insert(Entry::synthetic(street));
            }
        }
        for (street, ids) in index.streets.iter() {
            log::info!("{:<32}{:<32}", format!("loaded {} strategies", street), ids.len());
        }
        index.manifest = Some(manifest);
        index
    }
    fn insert(&mut self, entry: Entry) {
        let id = self.entries.len();
        self.exact.entry(entry.fingerprint().clone()).or_insert(id);
        self.streets.entry(entry.street()).or_default().push(id);
        self.entries.push(entry);
    }
}

impl Strategies {
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }
    /// Manifest version of the cache in use, if any.
    pub fn version(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.version.as_str())
    }
    pub fn supports(&self, street: Street) -> bool {
        self.manifest.as_ref().is_some_and(|m| m.supports(street))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
    /// Entries per street, synthetic ones included.
    pub fn counts(&self) -> BTreeMap<Street, usize> {
        self.streets
            .iter()
            .map(|(street, ids)| (*street, ids.len()))
            .collect()
    }
}

impl Strategies {
    /// Exact fingerprint lookup. Unsupported streets miss immediately.
    pub fn query(&self, state: &GameState) -> Option<&Entry> {
        if !self.supports(state.street()) {
            return None;
        }
        self.exact
            .get(&Fingerprint::from(state))
            .map(|id| &self.entries[*id])
    }
    /// First entry on the street solved for hero's position, else the first
    /// entry loaded for the street.
    pub fn query_approximate(&self, state: &GameState) -> Option<&Entry> {
        if !self.supports(state.street()) {
            return None;
        }
        let ids = self.streets.get(&state.street())?;
        ids.iter()
            .map(|id| &self.entries[*id])
            .find(|entry| entry.record().references(state.hero()))
            .or_else(|| ids.first().map(|id| &self.entries[*id]))
    }
    /// Exact lookup, falling back to approximate.
    pub fn lookup(&self, state: &GameState) -> Option<Hit<'_>> {
        if let Some(entry) = self.query(state) {
            return Some(Hit {
                entry,
                kind: Match::Exact,
            });
        }
        self.query_approximate(state).map(|entry| Hit {
            entry,
            kind: match entry.is_synthetic() {
                true => Match::Synthetic,
                false => Match::Approximate,
            },
        })
    }
}

impl Strategies {
    /// Writes a manifest under `root`, creating it if needed.
    pub fn write_manifest(root: &Path, manifest: &Manifest) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(root)?;
        let path = root.join(CACHE_MANIFEST);
        let file = std::fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        serde_json::to_writer_pretty(file, manifest)?;
        Ok(path)
    }
    /// Writes a zstd-compressed record into `root/<street>/`.
    pub fn write_record(root: &Path, street: Street, record: &StrategyRecord) -> anyhow::Result<PathBuf> {
        let dir = root.join(street.label());
        std::fs::create_dir_all(&dir)?;
        let name = record.fingerprint.as_str().replace(|c: char| !c.is_ascii_alphanumeric(), "_");
        let path = dir.join(format!("{}.json.zst", name));
        let file = std::fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = zstd::stream::Encoder::new(std::io::BufWriter::new(file), 0)?;
        serde_json::to_writer(&mut writer, record)?;
        writer.finish()?;
        Ok(path)
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

/// Decompresses a record, falling back to the raw bytes when the file is
/// not valid zstd.
fn read_record(path: &Path) -> anyhow::Result<StrategyRecord> {
    let bytes = std::fs::read(path)?;
    let json = match zstd::stream::decode_all(bytes.as_slice()) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("{:<32}{:<32}", "decompression failed, reading raw", format!("{}: {}", path.display(), e));
            bytes
        }
    };
    serde_json::from_slice(&json).context("parse record")
}
