//! Per-file comparison strategy configuration.
//!
//! Output from most examples is reproducible and compares verbatim. The rest
//! fall into a handful of nondeterminism patterns, so each such source file
//! is assigned an adjustment chain by simple file name. The tables here are
//! built once at startup and are read-only afterward; a `Duet` borrows the
//! config for the duration of its construction.
//!
//! Lookup is by simple name only, never by path, so two distinct files with
//! the same name necessarily share a strategy. That is an accepted
//! limitation of the corpus layout, not a bug.

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use crate::adjust::{Adjustment, AdjustmentChain};

/// Width the embedded documentation comments are wrapped to; captured output
/// is re-wrapped to the same width before comparison.
pub const MAX_LINE_WIDTH: usize = 59;

/// Maps a source file's simple name to its adjustment chain.
#[derive(Debug, Default)]
pub struct StrategyTable {
    entries: HashMap<String, AdjustmentChain>,
}

impl StrategyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_key: impl Into<String>, chain: AdjustmentChain) {
        self.entries.insert(file_key.into(), chain);
    }

    /// Keys are matched exactly and case-sensitively; an absent key yields
    /// the identity chain.
    pub fn resolve(&self, file_key: &str) -> &[Adjustment] {
        self.entries
            .get(file_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Maps a generated-artifact stem to the source file that actually produced
/// it, for the cases where the two diverge (inner classes, test harnesses).
#[derive(Debug, Default)]
pub struct FileNameTranslation {
    entries: HashMap<String, String>,
}

impl FileNameTranslation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, derived: impl Into<String>, actual: impl Into<String>) {
        self.entries.insert(derived.into(), actual.into());
    }

    pub fn translate(&self, derived: &str) -> Option<&str> {
        self.entries.get(derived).map(String::as_str)
    }
}

/// Immutable process-wide configuration for the validation pipeline.
#[derive(Debug)]
pub struct ValidationConfig {
    pub strategies: StrategyTable,
    pub translations: FileNameTranslation,
    pub wrap_width: usize,
    /// Name of the directory the run was invoked from; a leading companion
    /// path component equal to it is dropped during source resolution.
    pub invoking_dir: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strategies: corpus_strategies(),
            translations: corpus_translations(),
            wrap_width: MAX_LINE_WIDTH,
            invoking_dir: invoking_dir_name(),
        }
    }
}

/// Shared default configuration; built on first use, never mutated.
pub static DEFAULT_CONFIG: Lazy<ValidationConfig> = Lazy::new(ValidationConfig::default);

fn invoking_dir_name() -> Option<String> {
    env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
}

/// The built-in strategy table for the example corpus.
fn corpus_strategies() -> StrategyTable {
    use Adjustment::*;

    let mut table = StrategyTable::new();

    // Thread scheduling reorders whole lines.
    for key in [
        "ToastOMatic.java",
        "ThreadVariations.java",
        "Interrupting.java",
        "SyncObject.java",
        "UseCaseTracker.java",
        "AtUnitComposition.java",
        "AtUnitExample1.java",
        "AtUnitExample2.java",
        "AtUnitExample3.java",
        "AtUnitExample5.java",
        "AtUnitExternalTest.java",
        "HashSetTest.java",
        "StackLStringTest.java",
        "WaxOMatic2.java",
    ] {
        table.insert(key, vec![SortLines]);
    }
    table.insert("ActiveObjectDemo.java", vec![SortLines, StripDigits]);

    // Unordered containers reorder tokens within lines.
    table.insert("ForEach.java", vec![SortWords]);
    table.insert(
        "PetCount4.java",
        vec![RemoveCharacters("{}".to_string()), SortWords],
    );

    // Interleaved output: only the vocabulary is stable.
    for key in [
        "CachedThreadPool.java",
        "FixedThreadPool.java",
        "MoreBasicThreads.java",
        "ConstantSpecificMethod.java",
    ] {
        table.insert(key, vec![WordsOnly]);
    }
    table.insert("BankTellerSimulation.java", vec![WordsOnly, UniqueWords]);

    // Timing-dependent numbers.
    for key in [
        "MapComparisons.java",
        "ListComparisons.java",
        "NotifyVsNotifyAll.java",
        "SelfManaged.java",
        "SimpleMicroBenchmark.java",
        "SimpleThread.java",
        "SleepingTask.java",
        "ExchangerDemo.java",
        "Compete.java",
        "MappedIO.java",
        "Directories.java",
        "Find.java",
        "PathAnalysis.java",
        "TreeWatcher.java",
        "Mixins.java",
        "ListPerformance.java",
        "MapPerformance.java",
        "SetPerformance.java",
        "SynchronizationComparisons.java",
        "AtomicityTest.java",
        "TypesForSets.java",
        "PrintableLogRecord.java",
        "LockingMappedFiles.java",
        "ExplicitCriticalSection.java",
    ] {
        table.insert(key, vec![StripDigits]);
    }

    // Lines carrying machine-local detail.
    table.insert("Conversion.java", vec![DeleteLines(vec![27, 28])]);
    table.insert("DynamicProxyMixin.java", vec![DeleteLines(vec![2])]);
    table.insert("PreferencesDemo.java", vec![DeleteLines(vec![5])]);

    table.insert("SerialNumberChecker.java", vec![StripDigits, UniqueLines]);
    table.insert("EvenSupplier.java", vec![StripDigits, UniqueLines]);
    table.insert("CarBuilder.java", vec![StripDigits, UniqueLines]);
    table.insert("CloseResource.java", vec![UniqueLines]);
    table.insert("SpringDetector.java", vec![StripDigits, SortWords]);
    table.insert("PipedIO.java", vec![UniqueWords]);

    table.insert("FillingLists.java", vec![StripAddresses, SortWords]);
    table.insert("SimpleDaemons.java", vec![StripAddresses, StripDigits]);
    table.insert(
        "CaptureUncaughtException.java",
        vec![StripAddresses, StripDigits, UniqueLines],
    );

    table
}

/// The built-in translation table for the example corpus.
fn corpus_translations() -> FileNameTranslation {
    let mut table = FileNameTranslation::new();
    table.insert("ApplyTest.java", "Apply.java");
    table.insert("FillTest.java", "Fill.java");
    table.insert("Fill2Test.java", "Fill2.java");
    table.insert("ClassInInterface$Test.java", "ClassInInterface.java");
    table.insert("TestBed$Tester.java", "TestBed.java");
    table
}
