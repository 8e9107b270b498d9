use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rangegen::{Block, Interval, Partitioner, RangeError, render, verify};

use crate::config::{Mode, default_ceiling};

/// One `.toml` fixture: a range and what generating it must produce.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Range bounds. Integers or strings, so invalid input can be tested too.
    pub min: toml::Value,
    pub max: toml::Value,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_ceiling")]
    pub ceiling_digits: u32,

    /// Expected patterns, in order.
    #[serde(default)]
    pub expect: Option<Vec<String>>,

    /// Expected error: the error's Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Expected cover defects, each a substring of the defect's Display
    /// string, in order. An empty list asserts an exact cover.
    #[serde(default)]
    pub expect_defects: Option<Vec<String>>,
}

fn bound_text(val: &toml::Value) -> String {
    match val {
        toml::Value::Integer(n) => n.to_string(),
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn generate(case: &TestCase) -> Result<(Interval, Vec<Block>), RangeError> {
    let partitioner = Partitioner::new(case.ceiling_digits, case.mode.into())?;
    let interval = Interval::parse(&bound_text(&case.min), &bound_text(&case.max))?;
    let blocks = partitioner.partition_interval(&interval)?;
    Ok((interval, blocks))
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let case: TestCase = match toml::from_str(&content) {
        Ok(case) => case,
        Err(e) => return fail(None, format!("TOML parse error: {}", e)),
    };
    let description = case.description.clone();

    let result = generate(&case);

    let outcome = match (&case.expect_error, &result) {
        (Some(expected_err), Err(err)) => {
            let err_str = err.to_string();
            if err_str.contains(expected_err.as_str()) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err_str
                ))
            }
        }
        (Some(expected_err), Ok(_)) => Some(format!(
            "expected error containing \"{}\", but generation succeeded",
            expected_err
        )),
        (None, Err(err)) => Some(format!("unexpected error: {}", err)),
        (None, Ok((interval, blocks))) => check_blocks(&case, interval, blocks),
    };

    match outcome {
        Some(reason) => fail(description, reason),
        None => TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        },
    }
}

/// Compare generated blocks against the case. Returns `Some(reason)` on mismatch.
fn check_blocks(case: &TestCase, interval: &Interval, blocks: &[Block]) -> Option<String> {
    if let Some(expected) = &case.expect {
        let actual: Vec<String> = blocks.iter().map(render).collect();
        if &actual != expected {
            return Some(format!(
                "pattern mismatch\n  expected: {}\n  actual:   {}",
                expected.join(" "),
                actual.join(" ")
            ));
        }
    }

    if let Some(expected) = &case.expect_defects {
        let defects = verify(interval.min, interval.max, blocks);
        if defects.len() != expected.len() {
            let actual: Vec<String> = defects.iter().map(|d| format!("  - {}", d)).collect();
            return Some(format!(
                "expected {} defect(s), got {}\n  actual defects:\n{}",
                expected.len(),
                defects.len(),
                if actual.is_empty() {
                    "    (none)".to_string()
                } else {
                    actual.join("\n")
                }
            ));
        }
        for (i, (actual, expected)) in defects.iter().zip(expected).enumerate() {
            let msg = actual.to_string();
            if !msg.contains(expected.as_str()) {
                return Some(format!(
                    "defect[{}]: expected message containing \"{}\", got: {}",
                    i, expected, msg
                ));
            }
        }
    }

    None
}

/// Discover `.toml` cases grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .toml cases found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} cases)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn label_for<'a>(result: &'a TestResult) -> &'a str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("?")
    })
}

/// Run every `.toml` case under `path` (or a single file).
/// If `categories` is non-empty, only run cases in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let run_categories: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no .toml cases found in {}", path.display());
            return 1;
        }
        if categories.is_empty() {
            all_categories
        } else {
            filter_categories(all_categories, categories)
        }
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!();
        eprintln!("{}", bold(header, no_color));

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label_for(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), label_for(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let bad = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            bad,
            passed,
            failed,
            passed + failed
        );
        1
    }
}

fn filter_categories(
    all_categories: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    let mut filtered = BTreeMap::new();
    for requested in requested {
        let req = requested.trim_matches('/');
        let mut found = false;
        for (cat, files) in &all_categories {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.clone(), files.clone());
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all_categories
                    .keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}
