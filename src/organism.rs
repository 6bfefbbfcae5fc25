//! Human organism collaborator: gene-alias resolution and genomic sequences.
//!
//! The wider pipeline asks an organism two things: translate the gene aliases
//! found in expression data into canonical gene ids (the thesaurus), and hand
//! back genomic sequences (promoter or 3' UTR) for a set of genes. [`Human`]
//! answers both from delimited flat files, loading each table on first access
//! and caching it for the lifetime of the organism.
//!
//! Aliases that the thesaurus does not know, and genes without an entry in
//! the requested sequence table, are skipped rather than treated as errors;
//! the result map simply omits them. Skips surface as debug diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use biclust::{Human, SequenceType};
//!
//! let mut human = Human::new("promoters.csv", "p3utrs.csv", "synonyms.csv");
//! assert_eq!(human.species(), "hsa");
//!
//! let sequences = human
//!     .sequences_for_genes_search(&["CDC2".to_string()], SequenceType::Promoter)
//!     .unwrap();
//! for (gene, sequence) in &sequences {
//!     println!("{}: {}", gene, sequence);
//! }
//! ```

use crate::dfile::{DelimitedFile, ReadOptions};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Genomic sequence category served by an organism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceType {
    /// Upstream promoter region.
    Promoter,
    /// 3' untranslated region.
    P3Utr,
}

/// Base-pair windows used when retrieving sequences, per sequence type and
/// per usage (motif search vs genome scan).
///
/// `Default` carries the standard human windows: promoters at `(0, 700)` and
/// 3' UTRs at `(0, 831)` for both search and scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDistances {
    pub promoter_search: (usize, usize),
    pub promoter_scan: (usize, usize),
    pub p3utr_search: (usize, usize),
    pub p3utr_scan: (usize, usize),
}

impl Default for SequenceDistances {
    fn default() -> Self {
        SequenceDistances {
            promoter_search: (0, 700),
            promoter_scan: (0, 700),
            p3utr_search: (0, 831),
            p3utr_scan: (0, 831),
        }
    }
}

impl SequenceDistances {
    /// Window applied when searching sequences of `seq_type` for motifs.
    pub fn search(&self, seq_type: SequenceType) -> (usize, usize) {
        match seq_type {
            SequenceType::Promoter => self.promoter_search,
            SequenceType::P3Utr => self.p3utr_search,
        }
    }

    /// Window applied when scanning sequences of `seq_type` for matches.
    pub fn scan(&self, seq_type: SequenceType) -> (usize, usize) {
        match seq_type {
            SequenceType::Promoter => self.promoter_scan,
            SequenceType::P3Utr => self.p3utr_scan,
        }
    }
}

/// Human organism backed by flat-file sequence and synonym tables.
///
/// The thesaurus file is semicolon-separated `alias;gene` records; sequence
/// files are comma-separated `gene,sequence` records. Keys are uppercased at
/// load time, and every canonical gene id also resolves to itself. All three
/// tables load lazily and are never invalidated.
#[derive(Clone, Debug)]
pub struct Human {
    promoter_path: PathBuf,
    p3utr_path: PathBuf,
    thesaurus_path: PathBuf,
    distances: SequenceDistances,
    // Lazily loaded tables.
    synonyms: Option<HashMap<String, String>>,
    promoter_seqs: Option<HashMap<String, String>>,
    p3utr_seqs: Option<HashMap<String, String>>,
}

impl Human {
    /// Creates a human organism with the default sequence windows.
    pub fn new(
        promoter_path: impl Into<PathBuf>,
        p3utr_path: impl Into<PathBuf>,
        thesaurus_path: impl Into<PathBuf>,
    ) -> Self {
        Self::with_distances(
            promoter_path,
            p3utr_path,
            thesaurus_path,
            SequenceDistances::default(),
        )
    }

    /// Creates a human organism with explicit sequence windows.
    pub fn with_distances(
        promoter_path: impl Into<PathBuf>,
        p3utr_path: impl Into<PathBuf>,
        thesaurus_path: impl Into<PathBuf>,
        distances: SequenceDistances,
    ) -> Self {
        Human {
            promoter_path: promoter_path.into(),
            p3utr_path: p3utr_path.into(),
            thesaurus_path: thesaurus_path.into(),
            distances,
            synonyms: None,
            promoter_seqs: None,
            p3utr_seqs: None,
        }
    }

    // --- Accessors ---

    /// KEGG-style species code.
    pub fn species(&self) -> &'static str {
        "hsa"
    }

    /// Whether downstream motif tooling should use eukaryotic defaults.
    pub fn is_eukaryote(&self) -> bool {
        false
    }

    /// The configured sequence windows.
    pub fn distances(&self) -> &SequenceDistances {
        &self.distances
    }

    /// The alias → canonical gene id map, loaded on first access.
    pub fn thesaurus(&mut self) -> Result<&HashMap<String, String>> {
        self.ensure_thesaurus_loaded()?;
        Ok(self.synonyms.as_ref().unwrap())
    }

    // --- Sequence retrieval ---

    /// Sequences for `gene_aliases` using the search window for `seq_type`.
    ///
    /// The result maps canonical gene ids to sequences; aliases that resolve
    /// to nothing are omitted.
    pub fn sequences_for_genes_search(
        &mut self,
        gene_aliases: &[String],
        seq_type: SequenceType,
    ) -> Result<HashMap<String, String>> {
        let distance = self.distances.search(seq_type);
        self.sequences_for_genes(gene_aliases, seq_type, distance)
    }

    /// Sequences for `gene_aliases` using the scan window for `seq_type`.
    pub fn sequences_for_genes_scan(
        &mut self,
        gene_aliases: &[String],
        seq_type: SequenceType,
    ) -> Result<HashMap<String, String>> {
        let distance = self.distances.scan(seq_type);
        self.sequences_for_genes(gene_aliases, seq_type, distance)
    }

    fn sequences_for_genes(
        &mut self,
        gene_aliases: &[String],
        seq_type: SequenceType,
        distance: (usize, usize),
    ) -> Result<HashMap<String, String>> {
        debug!(
            num_aliases = gene_aliases.len(),
            ?seq_type,
            ?distance,
            "retrieving sequences"
        );
        self.ensure_thesaurus_loaded()?;
        self.ensure_sequences_loaded(seq_type)?;
        let synonyms = self.synonyms.as_ref().unwrap();
        let table = match seq_type {
            SequenceType::Promoter => self.promoter_seqs.as_ref().unwrap(),
            SequenceType::P3Utr => self.p3utr_seqs.as_ref().unwrap(),
        };

        let mut result = HashMap::new();
        for alias in gene_aliases {
            match synonyms.get(alias) {
                Some(gene) => match table.get(gene) {
                    Some(sequence) => {
                        result.insert(gene.clone(), sequence.clone());
                    }
                    None => debug!(%gene, ?seq_type, "no sequence for gene"),
                },
                None => debug!(%alias, "alias not in thesaurus"),
            }
        }
        Ok(result)
    }

    fn ensure_thesaurus_loaded(&mut self) -> Result<()> {
        if self.synonyms.is_none() {
            let table = load_thesaurus(&self.thesaurus_path)?;
            debug!(entries = table.len(), "thesaurus loaded");
            self.synonyms = Some(table);
        }
        Ok(())
    }

    fn ensure_sequences_loaded(&mut self, seq_type: SequenceType) -> Result<()> {
        let (cache, path) = match seq_type {
            SequenceType::Promoter => (&mut self.promoter_seqs, &self.promoter_path),
            SequenceType::P3Utr => (&mut self.p3utr_seqs, &self.p3utr_path),
        };
        if cache.is_none() {
            let table = load_sequence_table(path)?;
            debug!(?seq_type, entries = table.len(), "sequence table loaded");
            *cache = Some(table);
        }
        Ok(())
    }
}

/// Loads `alias;gene` records, uppercasing both sides and adding a
/// self-mapping for each canonical gene id.
fn load_thesaurus(path: &Path) -> Result<HashMap<String, String>> {
    let options = ReadOptions {
        separator: ';',
        ..ReadOptions::default()
    };
    let dfile = DelimitedFile::read(path, options)?;
    let mut result = HashMap::new();
    for fields in dfile.lines() {
        if fields.len() < 2 {
            warn!(path = %path.display(), record = ?fields, "short thesaurus record skipped");
            continue;
        }
        let gene = fields[1].to_uppercase();
        result.insert(fields[0].to_uppercase(), gene.clone());
        result.insert(gene.clone(), gene);
    }
    Ok(result)
}

/// Loads `gene,sequence` records keyed by uppercased gene id.
fn load_sequence_table(path: &Path) -> Result<HashMap<String, String>> {
    let options = ReadOptions {
        separator: ',',
        ..ReadOptions::default()
    };
    let dfile = DelimitedFile::read(path, options)?;
    let mut result = HashMap::new();
    for fields in dfile.lines() {
        if fields.len() < 2 {
            warn!(path = %path.display(), record = ?fields, "short sequence record skipped");
            continue;
        }
        result.insert(fields[0].to_uppercase(), fields[1].clone());
    }
    Ok(result)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BiclustError;

    /// Writes the three backing files and builds an organism over them.
    ///
    /// CDC2 is the historical alias of CDK1; TP53 has a promoter entry but
    /// no 3' UTR entry.
    fn fixture_organism(dir: &Path) -> Human {
        let promoter_path = dir.join("promoters.csv");
        let p3utr_path = dir.join("p3utrs.csv");
        let thesaurus_path = dir.join("synonyms.csv");
        std::fs::write(&promoter_path, "CDK1,ACGTACGTACGT\nTP53,TTTTCCCCGGGG\n")
            .expect("write promoters");
        std::fs::write(&p3utr_path, "CDK1,GGGGAAAATTTT\n").expect("write p3utrs");
        std::fs::write(&thesaurus_path, "CDC2;CDK1\np53;TP53\n").expect("write thesaurus");
        Human::new(promoter_path, p3utr_path, thesaurus_path)
    }

    #[test]
    fn test_species_identity() {
        let dir = tempfile::tempdir().expect("temp dir");
        let human = fixture_organism(dir.path());
        assert_eq!(human.species(), "hsa");
        assert!(!human.is_eukaryote());
    }

    #[test]
    fn test_thesaurus_uppercases_and_self_maps() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut human = fixture_organism(dir.path());
        let thesaurus = human.thesaurus().expect("thesaurus");

        assert_eq!(thesaurus.get("CDC2"), Some(&"CDK1".to_string()));
        assert_eq!(
            thesaurus.get("P53"),
            Some(&"TP53".to_string()),
            "Aliases should be uppercased at load time"
        );
        assert_eq!(
            thesaurus.get("CDK1"),
            Some(&"CDK1".to_string()),
            "Canonical ids should resolve to themselves"
        );
        assert!(!thesaurus.contains_key("p53"), "Keys are uppercased");
    }

    #[test]
    fn test_short_thesaurus_records_skipped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("synonyms.csv");
        std::fs::write(&path, "CDC2;CDK1\nJUNKLINE\n").expect("write thesaurus");
        let mut human = Human::new(
            dir.path().join("promoters.csv"),
            dir.path().join("p3utrs.csv"),
            path,
        );

        let thesaurus = human.thesaurus().expect("thesaurus");
        assert_eq!(thesaurus.len(), 2, "Alias plus self-mapping, junk dropped");
    }

    #[test]
    fn test_promoter_search_resolves_aliases() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut human = fixture_organism(dir.path());

        let sequences = human
            .sequences_for_genes_search(
                &[
                    "CDC2".to_string(),
                    "P53".to_string(),
                    "NOSUCH".to_string(),
                ],
                SequenceType::Promoter,
            )
            .expect("sequences");

        assert_eq!(sequences.len(), 2, "Unknown alias should be skipped");
        assert_eq!(sequences.get("CDK1"), Some(&"ACGTACGTACGT".to_string()));
        assert_eq!(sequences.get("TP53"), Some(&"TTTTCCCCGGGG".to_string()));
    }

    #[test]
    fn test_p3utr_scan_skips_genes_without_sequence() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut human = fixture_organism(dir.path());

        let sequences = human
            .sequences_for_genes_scan(
                &["CDC2".to_string(), "P53".to_string()],
                SequenceType::P3Utr,
            )
            .expect("sequences");

        // TP53 resolves in the thesaurus but has no 3' UTR entry.
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences.get("CDK1"), Some(&"GGGGAAAATTTT".to_string()));
    }

    #[test]
    fn test_tables_cached_after_first_access() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut human = fixture_organism(dir.path());

        let first = human
            .sequences_for_genes_search(&["CDC2".to_string()], SequenceType::Promoter)
            .expect("first lookup");
        assert_eq!(first.len(), 1);

        // With the backing files gone, only the caches can answer.
        std::fs::remove_file(dir.path().join("promoters.csv")).expect("remove promoters");
        std::fs::remove_file(dir.path().join("synonyms.csv")).expect("remove thesaurus");

        let second = human
            .sequences_for_genes_search(&["CDC2".to_string()], SequenceType::Promoter)
            .expect("cached lookup");
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_and_custom_distances() {
        let distances = SequenceDistances::default();
        assert_eq!(distances.search(SequenceType::Promoter), (0, 700));
        assert_eq!(distances.scan(SequenceType::Promoter), (0, 700));
        assert_eq!(distances.search(SequenceType::P3Utr), (0, 831));
        assert_eq!(distances.scan(SequenceType::P3Utr), (0, 831));

        let custom = SequenceDistances {
            promoter_search: (0, 2000),
            ..SequenceDistances::default()
        };
        let human = Human::with_distances("p.csv", "u.csv", "s.csv", custom);
        assert_eq!(human.distances().search(SequenceType::Promoter), (0, 2000));
        assert_eq!(human.distances().scan(SequenceType::Promoter), (0, 700));
    }

    #[test]
    fn test_distances_serde_round_trip() {
        let distances = SequenceDistances {
            promoter_scan: (100, 1500),
            ..SequenceDistances::default()
        };
        let json = serde_json::to_string(&distances).expect("serialize");
        let back: SequenceDistances = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, distances);
    }

    #[test]
    fn test_missing_backing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut human = Human::new(
            dir.path().join("absent_promoters.csv"),
            dir.path().join("absent_p3utrs.csv"),
            dir.path().join("absent_synonyms.csv"),
        );
        let err = human.thesaurus().unwrap_err();
        assert!(matches!(err, BiclustError::Io { .. }));
    }
}
