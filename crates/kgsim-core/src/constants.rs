/// kgsim version string.
pub const KGSIM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ontology root class whose transitive instance count is `N` in the IDF and
/// Jiang-Conrath formulas (Wikidata `entity`).
pub const ROOT_CLASS: &str = "Q35120";

/// Separator between entries of a compact class-count string.
pub const CLASS_ENTRY_SEPARATOR: char = '|';

/// Separator between class id and count inside one compact entry.
pub const CLASS_COUNT_SEPARATOR: char = ':';

/// Upper bound on ancestor-closure depth when resolving subsumers locally.
/// Guards against malformed ontologies with very long or cyclic chains.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "KGSIM_";

/// Project config file name looked up in the config root.
pub const CONFIG_FILENAME: &str = "kgsim.toml";
